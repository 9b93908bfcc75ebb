// Two-phase reader: a nom-combinator tokenizer producing a flat token
// stream, followed by a hand-written cursor parser over that stream (nom
// buys nothing for a second pass over already-flat tokens).

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, one_of},
    combinator::{opt, recognize},
    multi::many0,
    sequence::delimited,
    IResult, Parser,
};

use crate::error::PlpError;
use crate::value::{AtomKey, PlpMap, Value};

fn is_ws_or_comma(c: char) -> bool {
    c.is_whitespace() || c == ','
}

fn is_delimiter(c: char) -> bool {
    matches!(c, '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '`' | '~' | '^' | '@')
        || is_ws_or_comma(c)
        || c == '"'
        || c == ';'
}

fn quoted_string(input: &str) -> IResult<&str, &str> {
    recognize(delimited(
        char('"'),
        many0(alt((
            recognize((char('\\'), nom::character::complete::anychar)),
            recognize(nom::character::complete::none_of("\"\\")),
        ))),
        opt(char('"')),
    ))
    .parse(input)
}

fn line_comment(input: &str) -> IResult<&str, &str> {
    recognize((char(';'), take_while(|c| c != '\n'))).parse(input)
}

fn atom_run(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !is_delimiter(c))(input)
}

fn one_token(input: &str) -> IResult<&str, &str> {
    alt((
        tag("~@"),
        recognize(one_of("[]{}()'`~^@")),
        quoted_string,
        line_comment,
        atom_run,
    ))
    .parse(input)
}

/// Splits source text into a flat sequence of tokens, skipping whitespace
/// and commas (which are interchangeable separators). Comment tokens
/// (`;...`) are kept in the stream; the parser skips them.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = input;
    loop {
        let (after_ws, _) = take_while::<_, _, nom::error::Error<&str>>(is_ws_or_comma)(rest)
            .unwrap_or((rest, ""));
        rest = after_ws;
        if rest.is_empty() {
            break;
        }
        match one_token(rest) {
            Ok((remaining, tok)) if !tok.is_empty() => {
                tokens.push(tok.to_string());
                rest = remaining;
            }
            _ => break,
        }
    }
    tokens
}

struct Cursor<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).map(|s| s.as_str())
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

/// Reads exactly one top-level value from `input`. Stops as soon as one
/// value is assembled; any trailing tokens are left unconsumed (this is
/// why `load-file`'s bootstrap wraps a whole file's contents in a single
/// enclosing `(do ...)` before reading it).
pub fn read_str(input: &str) -> Result<Value, PlpError> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Err(PlpError::Generic("empty line!".to_string()));
    }
    let mut cursor = Cursor { tokens: &tokens, pos: 0 };
    read_value(&mut cursor)
}

fn read_value(cursor: &mut Cursor) -> Result<Value, PlpError> {
    let token = cursor
        .peek()
        .ok_or_else(|| PlpError::Unmatched("unexpected end of input".to_string()))?;

    if let Some(stripped) = token.strip_prefix(';') {
        let _ = stripped;
        cursor.advance();
        return read_value(cursor);
    }

    match token {
        "'" => {
            cursor.advance();
            let quoted = read_value(cursor)?;
            Ok(Value::list(vec![Value::Symbol("quote".to_string()), quoted]))
        }
        "(" => {
            cursor.advance();
            let items = read_sequence(cursor, ")")?;
            Ok(Value::list(items))
        }
        ")" => Err(PlpError::Unmatched("unexpected \")\"".to_string())),
        "[" => {
            cursor.advance();
            let items = read_sequence(cursor, "]")?;
            Ok(Value::vector(items))
        }
        "]" => Err(PlpError::Unmatched("unexpected \"]\"".to_string())),
        "{" => {
            cursor.advance();
            let items = read_sequence(cursor, "}")?;
            read_hash_map(items)
        }
        "}" => Err(PlpError::Unmatched("unexpected \"}\"".to_string())),
        _ => read_atom(cursor),
    }
}

fn read_sequence(cursor: &mut Cursor, end: &str) -> Result<Vec<Value>, PlpError> {
    let mut result = Vec::new();
    loop {
        match cursor.peek() {
            Some(tok) if tok == end => {
                cursor.advance();
                return Ok(result);
            }
            Some(tok) if tok.starts_with(';') => {
                cursor.advance();
            }
            None => return Err(PlpError::Unmatched(format!("missing closing \"{}\"", end))),
            Some(_) => result.push(read_value(cursor)?),
        }
    }
}

fn read_hash_map(items: Vec<Value>) -> Result<Value, PlpError> {
    if items.len() % 2 != 0 {
        return Err(PlpError::SyntaxError(
            "can't initialize hashmap with a missing value".to_string(),
        ));
    }
    let mut pairs = Vec::with_capacity(items.len() / 2);
    for pair in items.chunks(2) {
        let key = AtomKey::from_value(&pair[0])
            .ok_or_else(|| PlpError::SyntaxError(format!("can't have key of type '{}' in a hashmap", pair[0].type_name())))?;
        pairs.push((key, pair[1].clone()));
    }
    let map = PlpMap::from_pairs(pairs)
        .map_err(|key| PlpError::SyntaxError(format!("can't initialize hashmap with two or more same keys: '{}'", key)))?;
    Ok(Value::HashMap(std::rc::Rc::new(map)))
}

fn read_atom(cursor: &mut Cursor) -> Result<Value, PlpError> {
    let token = cursor.peek().expect("read_atom called with no token");
    let value = if let Ok(n) = token.parse::<i64>() {
        Value::Integer(n)
    } else if let Ok(n) = token.parse::<f64>() {
        Value::Float(n)
    } else if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        Value::String(unescape(&token[1..token.len() - 1]))
    } else if token.starts_with('"') {
        return Err(PlpError::Unmatched("expected closing '\"'".to_string()));
    } else if let Some(kw) = token.strip_prefix(':') {
        Value::Keyword(kw.to_string())
    } else if token == "true" {
        Value::Boolean(true)
    } else if token == "false" {
        Value::Boolean(false)
    } else if token == "nil" {
        Value::Nil
    } else {
        Value::Symbol(token.to_string())
    };
    cursor.advance();
    Ok(value)
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}
