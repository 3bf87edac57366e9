use logos::Logos;

/// Lexical units of SQL text as seen by the token matcher.
///
/// A word is a maximal run of word characters; every other non-whitespace
/// character stands alone, so `>=` lexes as `>` followed by `=`.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
#[logos(skip r"\s+")]
pub enum Token<'a> {
    #[regex(r"\w+", |lex| lex.slice())]
    Word(&'a str),
    #[regex(r"[^\w\s]", |lex| lex.slice())]
    Symbol(&'a str),
}

impl<'a> Token<'a> {
    pub fn as_str(&self) -> &'a str {
        match *self {
            Token::Word(text) | Token::Symbol(text) => text,
        }
    }
}

/// Splits SQL into lower-cased tokens in source order.
///
/// A missing query yields no tokens.
pub fn tokenize<'a>(sql: impl Into<Option<&'a str>>) -> Vec<String> {
    let Some(sql) = sql.into() else {
        return Vec::new();
    };
    let mut lexer = Token::lexer(sql);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next() {
        let text = match token {
            Ok(token) => token.as_str(),
            // a character neither pattern claims still counts as one symbol
            Err(()) => lexer.slice(),
        };
        tokens.push(text.to_lowercase());
    }
    tracing::trace!(count = tokens.len(), "tokenized query");
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use logos::Logos;

    #[test]
    fn test_select_query() {
        let query = "SELECT CustomerName, City FROM Customers WHERE Country = 'Mexico';";
        let mut lexer = Token::lexer(query);
        assert_eq!(lexer.next(), Some(Ok(Token::Word("SELECT"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Word("CustomerName"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Symbol(","))));
        assert_eq!(lexer.next(), Some(Ok(Token::Word("City"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Word("FROM"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Word("Customers"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Word("WHERE"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Word("Country"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Symbol("="))));
        assert_eq!(lexer.next(), Some(Ok(Token::Symbol("'"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Word("Mexico"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Symbol("'"))));
        assert_eq!(lexer.next(), Some(Ok(Token::Symbol(";"))));
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn test_multi_char_operator_is_split() {
        assert_eq!(
            tokenize("SELECT a FROM t WHERE a>=1"),
            vec!["select", "a", "from", "t", "where", "a", ">", "=", "1"]
        );
        assert_eq!(tokenize("x <> y"), vec!["x", "<", ">", "y"]);
    }

    #[test]
    fn test_function_call() {
        assert_eq!(
            tokenize("SELECT count(*) FROM head WHERE age  >  56"),
            vec!["select", "count", "(", "*", ")", "from", "head", "where", "age", ">", "56"]
        );
    }

    #[test]
    fn test_qualified_names_and_underscores() {
        assert_eq!(
            tokenize("T1.Customer_ID=t2.id"),
            vec!["t1", ".", "customer_id", "=", "t2", ".", "id"]
        );
    }

    #[test]
    fn test_string_literal_words_are_split() {
        assert_eq!(
            tokenize("name = \"Alfred Schmidt\""),
            vec!["name", "=", "\"", "alfred", "schmidt", "\""]
        );
    }

    #[test]
    fn test_decimal_splits_on_dot() {
        assert_eq!(tokenize("price > 10.5"), vec!["price", ">", "10", ".", "5"]);
    }

    #[test]
    fn test_missing_and_blank_input() {
        assert!(tokenize(None::<&str>).is_empty());
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\r\n ").is_empty());
    }

    #[test]
    fn test_unicode_word_characters() {
        assert_eq!(tokenize("SELECT Größe FROM t"), vec!["select", "größe", "from", "t"]);
    }
}
