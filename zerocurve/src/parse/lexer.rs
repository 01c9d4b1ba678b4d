use crate::{Error, var::Var};

#[derive(Copy, Clone, Debug, PartialEq)]
pub(super) enum Token {
    Number(f64),
    Letter(Var),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Bar,
}

impl Token {
    /// Checks whether this token can begin a `primitive`
    ///
    /// `-` is excluded, since a leading minus is only valid in `primitive2`
    /// and must otherwise be read as subtraction.
    pub fn starts_primitive(&self) -> bool {
        matches!(
            self,
            Token::Number(..) | Token::Letter(..) | Token::LParen | Token::Bar
        )
    }
}

/// Splits formula text into tokens, tagged with their byte offsets
pub(super) fn tokenize(text: &str) -> Result<Vec<(usize, Token)>, Error> {
    let bytes = text.as_bytes();
    let mut out = vec![];
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let t = match c {
            b if b.is_ascii_whitespace() => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'^' => Token::Caret,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'|' => Token::Bar,
            b'0'..=b'9' | b'.' => {
                let len = number_len(&bytes[i..]).ok_or(Error::Syntax {
                    position: i,
                    expected: "a number",
                })?;
                let v = text[i..i + len].parse::<f64>().map_err(|_| {
                    Error::Syntax {
                        position: i,
                        expected: "a number",
                    }
                })?;
                out.push((i, Token::Number(v)));
                i += len;
                continue;
            }
            _ => match Var::from_char(c as char) {
                Some(v) => Token::Letter(v),
                None => {
                    return Err(Error::Syntax {
                        position: i,
                        expected: "a number, variable, operator, or bracket",
                    });
                }
            },
        };
        out.push((i, t));
        i += 1;
    }
    Ok(out)
}

/// Returns the length of the number literal at the start of `s`
///
/// A literal is `digits [. digits]` or `. digits`, optionally followed by an
/// exponent `e [+-] digits`.  The exponent is only consumed if it has at
/// least one digit, so `2e` is a number followed by the variable `e`.
fn number_len(s: &[u8]) -> Option<usize> {
    let digits = |s: &[u8]| s.iter().take_while(|c| c.is_ascii_digit()).count();

    let mut n = digits(s);
    let mut mantissa = n;
    if s.get(n) == Some(&b'.') {
        let frac = digits(&s[n + 1..]);
        n += 1 + frac;
        mantissa += frac;
    }
    if mantissa == 0 {
        return None;
    }
    if matches!(s.get(n), Some(b'e' | b'E')) {
        let mut j = n + 1;
        if matches!(s.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp = digits(&s[j..]);
        if exp > 0 {
            n = j + exp;
        }
    }
    Some(n)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn lex_numbers() {
        assert_eq!(number_len(b"123"), Some(3));
        assert_eq!(number_len(b"1.5x"), Some(3));
        assert_eq!(number_len(b".25"), Some(3));
        assert_eq!(number_len(b"3."), Some(2));
        assert_eq!(number_len(b"1e-3+"), Some(4));
        assert_eq!(number_len(b"1e+"), Some(1));
        assert_eq!(number_len(b"2ex"), Some(1));
        assert_eq!(number_len(b"."), None);
    }

    #[test]
    fn lex_positions() {
        let t = tokenize(" x+ 12\n|y|").unwrap();
        let pos: Vec<usize> = t.iter().map(|(p, _)| *p).collect();
        assert_eq!(pos, [1, 2, 4, 7, 8, 9]);
        assert_eq!(t[2].1, Token::Number(12.0));
        assert_eq!(t[4].1, Token::Letter(Var::Y));

        assert!(matches!(
            tokenize("x # y"),
            Err(Error::Syntax { position: 2, .. })
        ));
    }
}
