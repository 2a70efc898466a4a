#[cfg(test)]
mod scanner_tests {
    use golox::error::LoxError;
    use golox::reporter::{CollectingReporter, Reporter};
    use golox::scanner::*;
    use golox::token::*;
    use golox::value::Number;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source.as_bytes());
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    fn kinds_and_lexemes(source: &str) -> Vec<(String, String)> {
        let mut reporter = CollectingReporter::new();
        Scanner::new(source.as_bytes())
            .scan_tokens(&mut reporter)
            .into_iter()
            .map(|t| (t.token_type.name().to_string(), t.lexeme))
            .collect()
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})?:",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::QUESTION, "?"),
                (TokenType::COLON, ":"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators_are_greedy() {
        assert_token_sequence(
            "! != = == < <= > >= / // comment\n",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "fn break continue class this var_1 _x print",
            &[
                (TokenType::FN, "fn"),
                (TokenType::BREAK, "break"),
                (TokenType::CONTINUE, "continue"),
                (TokenType::CLASS, "class"),
                (TokenType::THIS, "this"),
                (TokenType::IDENTIFIER, "var_1"),
                (TokenType::IDENTIFIER, "_x"),
                (TokenType::PRINT, "print"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_hyphen_is_not_an_identifier_character() {
        assert_token_sequence(
            "a-b",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::MINUS, "-"),
                (TokenType::IDENTIFIER, "b"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_05_number_literals() {
        let tokens: Vec<Token> = Scanner::new(b"12 3.25 7.")
            .filter_map(Result::ok)
            .collect();

        assert!(matches!(tokens[0].token_type, TokenType::NUMBER(Number::Int(12))));
        assert!(
            matches!(tokens[1].token_type, TokenType::NUMBER(Number::Float(f)) if f == 3.25)
        );
        // A trailing dot is not part of the number.
        assert!(matches!(tokens[2].token_type, TokenType::NUMBER(Number::Int(7))));
        assert_eq!(tokens[3].token_type, TokenType::DOT);
    }

    #[test]
    fn test_scanner_06_invalid_number() {
        let results: Vec<_> = Scanner::new(b"1.2.3;").collect();

        assert!(matches!(&results[0], Err(LoxError::Lex { message, .. }) if message == "Invalid number."));
        assert_eq!(results[1].as_ref().unwrap().token_type, TokenType::SEMICOLON);
    }

    #[test]
    fn test_scanner_07_strings_span_lines() {
        let tokens: Vec<Token> = Scanner::new(b"\"a\nb\" x")
            .filter_map(Result::ok)
            .collect();

        match &tokens[0].token_type {
            TokenType::STRING(s) => assert_eq!(s, "a\nb"),
            other => panic!("expected string, got {:?}", other),
        }
        assert_eq!(tokens[0].lexeme, "\"a\nb\"");
        assert_eq!(tokens[1].line, 2);
    }

    #[test]
    fn test_scanner_08_unterminated_string() {
        let mut reporter = CollectingReporter::new();
        let tokens = Scanner::new(b"\"never closed").scan_tokens(&mut reporter);

        assert!(reporter.had_error());
        assert_eq!(reporter.static_errors, vec!["[line 1] Error: Unterminated string."]);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, TokenType::EOF);
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let scanner = Scanner::new(source.as_bytes());

        let results: Vec<_> = scanner.collect();

        // 0: COMMA, 1: DOT, 2: error for '$', 3: LEFT_PAREN, 4: error for '#', 5: EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_eq!(results[0].as_ref().unwrap().token_type, TokenType::COMMA);
        assert_eq!(results[1].as_ref().unwrap().token_type, TokenType::DOT);
        assert_eq!(results[3].as_ref().unwrap().token_type, TokenType::LEFT_PAREN);
        assert_eq!(results[5].as_ref().unwrap().token_type, TokenType::EOF);

        let error_count = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(error_count, 2, "Expected 2 error messages");

        for err in results.iter().filter_map(|r| r.as_ref().err()) {
            assert!(
                err.to_string().contains("Unexpected character."),
                "unexpected message: {}",
                err
            );
        }
    }

    #[test]
    fn test_non_ascii_character_is_one_error() {
        let results: Vec<_> = Scanner::new("a é b".as_bytes()).collect();

        let errors: Vec<_> = results.iter().filter_map(|r| r.as_ref().err()).collect();
        assert_eq!(errors.len(), 1, "errors: {:?}", errors);
        assert!(errors[0].to_string().contains("Unexpected character."));

        let lexemes: Vec<&str> = results
            .iter()
            .filter_map(|r| r.as_ref().ok())
            .map(|t| t.lexeme.as_str())
            .collect();
        assert_eq!(lexemes, vec!["a", "b", ""]);
    }

    #[test]
    fn test_positions_track_lines_and_columns() {
        let tokens: Vec<Token> = Scanner::new(b"var a;\n  print a;")
            .filter_map(Result::ok)
            .collect();

        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (1, 5));
        assert_eq!((tokens[3].line, tokens[3].column), (2, 3));
    }

    #[test]
    fn test_token_display() {
        let tokens: Vec<String> = Scanner::new(b"x 2 2.5 \"hi\"")
            .filter_map(Result::ok)
            .map(|t| t.to_string())
            .collect();

        assert_eq!(
            tokens,
            vec![
                "IDENTIFIER x null",
                "NUMBER 2 2",
                "NUMBER 2.5 2.5",
                "STRING \"hi\" hi",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_lexemes_rescan_to_the_same_sequence() {
        let source = r#"
            fn fib(n) { if (n<2) { return n; } return fib(n-1)+fib(n-2); }
            class Greeter { greet(name){ print "hi " + name; } }
            var x = 1.5 >= 2 ? !true : nil; // trailing comment
            outer: for (var i=0; i<3; i=i+1) { continue outer; }
        "#;

        let first = kinds_and_lexemes(source);
        let joined: String = first
            .iter()
            .map(|(_, lexeme)| lexeme.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let second = kinds_and_lexemes(&joined);

        assert_eq!(first, second);
    }
}
