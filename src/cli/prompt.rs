//! Interactive prompt helpers for session setup
//!
//! Thin wrappers over stdin that keep re-prompting until the operator
//! enters something acceptable. Each helper has a `_from` variant generic
//! over the input stream so the loops can be tested with scripted input.

use std::{
    io::{self, BufRead, Write},
    str::FromStr,
};

use anyhow::{Result, bail};

fn read_line_from(input: &mut impl BufRead, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    let read = input.read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Prompt until the operator enters a parseable value
pub fn prompt_parse<T: FromStr>(prompt: &str) -> Result<T> {
    prompt_parse_from(&mut io::stdin().lock(), prompt)
}

pub fn prompt_parse_from<T: FromStr>(input: &mut impl BufRead, prompt: &str) -> Result<T> {
    loop {
        match read_line_from(input, prompt)? {
            None => bail!("input stream closed"),
            Some(line) => {
                if let Ok(value) = line.parse::<T>() {
                    return Ok(value);
                }
                println!("invalid input");
            }
        }
    }
}

/// Prompt for a non-empty free-form string
pub fn prompt_string(prompt: &str) -> Result<String> {
    prompt_string_from(&mut io::stdin().lock(), prompt)
}

pub fn prompt_string_from(input: &mut impl BufRead, prompt: &str) -> Result<String> {
    loop {
        match read_line_from(input, prompt)? {
            None => bail!("input stream closed"),
            Some(line) if !line.is_empty() => return Ok(line),
            Some(_) => println!("please enter a value"),
        }
    }
}

/// Prompt for a yes/no answer
pub fn prompt_bool(prompt: &str) -> Result<bool> {
    prompt_bool_from(&mut io::stdin().lock(), prompt)
}

pub fn prompt_bool_from(input: &mut impl BufRead, prompt: &str) -> Result<bool> {
    loop {
        match read_line_from(input, prompt)? {
            None => bail!("input stream closed"),
            Some(line) => match parse_bool_token(&line) {
                Some(value) => return Ok(value),
                None => println!("please answer y/n"),
            },
        }
    }
}

/// Prompt for a float, falling back to a default on empty input
pub fn prompt_f64_or(prompt: &str, default: f64) -> Result<f64> {
    prompt_f64_or_from(&mut io::stdin().lock(), prompt, default)
}

pub fn prompt_f64_or_from(input: &mut impl BufRead, prompt: &str, default: f64) -> Result<f64> {
    loop {
        match read_line_from(input, prompt)? {
            None => bail!("input stream closed"),
            Some(line) if line.is_empty() => return Ok(default),
            Some(line) => {
                if let Ok(value) = line.parse::<f64>() {
                    return Ok(value);
                }
                println!("invalid number");
            }
        }
    }
}

/// Interpret a yes/no token. Accepts y/yes/t/true and n/no/f/false in any
/// case; anything else is `None`.
pub fn parse_bool_token(token: &str) -> Option<bool> {
    match token.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "t" | "true" => Some(true),
        "n" | "no" | "f" | "false" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn test_parse_bool_token() {
        assert_eq!(parse_bool_token("y"), Some(true));
        assert_eq!(parse_bool_token("TRUE"), Some(true));
        assert_eq!(parse_bool_token("n"), Some(false));
        assert_eq!(parse_bool_token("False"), Some(false));
        assert_eq!(parse_bool_token("maybe"), None);
        assert_eq!(parse_bool_token(""), None);
    }

    #[test]
    fn test_prompt_parse_retries_until_parseable() {
        let mut input = Cursor::new("abc\n7\n");
        let value: usize = prompt_parse_from(&mut input, "? ").unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn test_prompt_f64_or_defaults_on_empty() {
        let mut input = Cursor::new("\n");
        assert_eq!(prompt_f64_or_from(&mut input, "? ", 0.5).unwrap(), 0.5);

        let mut input = Cursor::new("nope\n0.25\n");
        assert_eq!(prompt_f64_or_from(&mut input, "? ", 0.5).unwrap(), 0.25);
    }

    #[test]
    fn test_closed_input_errors() {
        let mut input = Cursor::new("");
        assert!(prompt_string_from(&mut input, "? ").is_err());
        assert!(prompt_bool_from(&mut input, "? ").is_err());
    }
}
