use anyhow::bail;

/// One lexical unit of a filter string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    And,
    Or,
    Open,
    Close,
    /// Atomic predicate text between operators.
    Text(String),
}

/// Split a filter string into tokens.
///
/// `&`, `|`, `(` and `)` are single-character tokens and never need
/// surrounding spaces. A backslash makes the next character literal, so
/// operator characters and spaces can appear inside predicate arguments.
/// Unescaped spaces only separate tokens and never reach an argument.
pub fn tokenize(input: &str) -> anyhow::Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut buffer = String::new();
    let mut escaped = false;

    for c in input.chars() {
        if escaped {
            buffer.push(c);
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            ' ' => flush(&mut tokens, &mut buffer),
            '&' => {
                flush(&mut tokens, &mut buffer);
                tokens.push(Token::And);
            }
            '|' => {
                flush(&mut tokens, &mut buffer);
                tokens.push(Token::Or);
            }
            '(' => {
                flush(&mut tokens, &mut buffer);
                tokens.push(Token::Open);
            }
            ')' => {
                flush(&mut tokens, &mut buffer);
                tokens.push(Token::Close);
            }
            _ => buffer.push(c),
        }
    }

    if escaped {
        bail!("trailing backslash escapes nothing");
    }
    flush(&mut tokens, &mut buffer);

    Ok(tokens)
}

fn flush(tokens: &mut Vec<Token>, buffer: &mut String) {
    if !buffer.is_empty() {
        tokens.push(Token::Text(std::mem::take(buffer)));
    }
}
