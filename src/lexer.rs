use chumsky::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Ident(String),
    Number(f64, bool), // (value, is_float)
    String(String),
    True,
    False,
    Null,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Eq,
    NotEq,
    Greater,
    Less,
    GreaterEq,
    LessEq,
    And,
    Or,
    Bang,

    Dot,
    LParen,
    RParen,
}

pub fn lexer<'a>()
-> impl Parser<'a, &'a str, Vec<(Token, SimpleSpan)>, extra::Err<Simple<'a, char>>> {
    let number = text::int(10)
        .then(just('.').then(text::digits(10)).or_not())
        .to_slice()
        .map(|s: &str| Token::Number(s.parse().unwrap(), s.contains('.')));

    let escape = just('\\').ignore_then(choice((
        just('\\'),
        just('/'),
        just('"'),
        just('n').to('\n'),
        just('r').to('\r'),
        just('t').to('\t'),
    )));

    let string = just('"')
        .ignore_then(none_of("\\\"").or(escape).repeated().collect::<String>())
        .then_ignore(just('"'))
        .map(Token::String);

    let ident = text::ident().map(|s: &str| match s {
        "true" => Token::True,
        "false" => Token::False,
        "null" => Token::Null,
        _ => Token::Ident(s.to_string()),
    });

    let op_binary = choice((
        just("==").to(Token::Eq),
        just("!=").to(Token::NotEq),
        just(">=").to(Token::GreaterEq),
        just("<=").to(Token::LessEq),
        just("&&").to(Token::And),
        just("||").to(Token::Or),
    ));

    let op_single = choice((
        just('+').to(Token::Plus),
        just('-').to(Token::Minus),
        just('*').to(Token::Star),
        just('/').to(Token::Slash),
        just('%').to(Token::Percent),
        just('^').to(Token::Caret),
        just('>').to(Token::Greater),
        just('<').to(Token::Less),
        just('!').to(Token::Bang),
        just('.').to(Token::Dot),
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
    ));

    let op = op_binary.or(op_single);

    let token = number
        .or(string)
        .or(ident)
        .or(op)
        .map_with(|tok, e| (tok, e.span()))
        .padded();

    token.repeated().collect().then_ignore(end())
}
