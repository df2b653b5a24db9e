use types::{Error, Word};

/// One formatter argument. There are no C-style varargs here; callers pass
/// an explicit slice that the directives consume left to right.
#[derive(Copy, Clone, Debug)]
pub enum FmtArg<'a> {
    Char(u8),
    Str(&'a str),
    Int(i32),
    Uint(u32),
}

impl FmtArg<'_> {
    fn scalar(self) -> Option<u32> {
        match self {
            FmtArg::Char(c) => Some(c as u32),
            FmtArg::Int(v) => Some(v as u32),
            FmtArg::Uint(v) => Some(v),
            FmtArg::Str(_) => None,
        }
    }
}

enum Piece<'a> {
    Char(u8),
    Str(&'a [u8]),
    Dec(i32),
    Uns(u32),
    Hex(u32),
}

/// Callback-driven `%`-directive formatter.
///
/// Supports `%c %s %d %u %x %%` with width, zero-padding, left-justify,
/// string precision (`%.Ns` truncation, a precision of zero meaning
/// unbounded) and `*` dynamic-width/precision flags. Unknown directive
/// characters render as
/// pointer-style hex (zero-padded to word width). Returns the total bytes
/// written, or the first negative result of the write callback; a malformed
/// format string or an exhausted argument list yields `-EINVAL`.
pub fn cbprintf<W>(write: &mut W, stream: Word, format: &str, args: &[FmtArg]) -> isize
where
    W: FnMut(Word, &[u8]) -> isize,
{
    let fmt = format.as_bytes();
    let mut args = args.iter().copied();
    let mut p = 0usize;
    let mut res: isize = 0;

    loop {
        // first consume everything until a '%'
        let skip = fmt[p..]
            .iter()
            .position(|&b| b == b'%')
            .unwrap_or(fmt.len() - p);
        if skip > 0 && !put(write, stream, &fmt[p..p + skip], &mut res) {
            return res;
        }
        p += skip;

        // hit end of string?
        if p == fmt.len() {
            return res;
        }

        // directive parser
        let mut zero_justify = false;
        let mut left_justify = false;
        let mut precision_mode = false;
        let mut width = 0usize;
        let mut precision = 0usize;

        let mut i = p + 1;
        let piece = loop {
            let Some(&c) = fmt.get(i) else {
                // dangling '%'
                return Error::Inval.to_word() as isize;
            };
            match c {
                b'0'..=b'9' => {
                    if precision_mode {
                        precision = precision * 10 + (c - b'0') as usize;
                    } else if c > b'0' || width > 0 {
                        width = width * 10 + (c - b'0') as usize;
                    } else {
                        zero_justify = true;
                    }
                }
                b'*' => {
                    // dynamic precision/width
                    match args.next().and_then(FmtArg::scalar) {
                        Some(w) if precision_mode => precision = w as usize,
                        Some(w) => width = w as usize,
                        None => return Error::Inval.to_word() as isize,
                    }
                }
                b'.' => precision_mode = true,
                b'-' => left_justify = true,
                b'%' => break Piece::Char(b'%'),
                b'c' => match args.next().and_then(FmtArg::scalar) {
                    Some(v) => break Piece::Char(v as u8),
                    None => return Error::Inval.to_word() as isize,
                },
                b's' => match args.next() {
                    Some(FmtArg::Str(s)) => {
                        // a zero precision means unbounded
                        let bytes = s.as_bytes();
                        let n = if precision > 0 {
                            bytes.len().min(precision)
                        } else {
                            bytes.len()
                        };
                        break Piece::Str(&bytes[..n]);
                    }
                    _ => return Error::Inval.to_word() as isize,
                },
                b'd' | b'i' => match args.next().and_then(FmtArg::scalar) {
                    Some(v) => break Piece::Dec(v as i32),
                    None => return Error::Inval.to_word() as isize,
                },
                b'u' => match args.next().and_then(FmtArg::scalar) {
                    Some(v) => break Piece::Uns(v),
                    None => return Error::Inval.to_word() as isize,
                },
                b' '..=b'?' => {
                    // unknown modifier, skip
                }
                _ => {
                    // hex, or an unknown directive rendered as a pointer
                    if c != b'x' && c != b'X' {
                        zero_justify = true;
                        width = 2 * core::mem::size_of::<usize>();
                    }
                    match args.next().and_then(FmtArg::scalar) {
                        Some(v) => break Piece::Hex(v),
                        None => return Error::Inval.to_word() as isize,
                    }
                }
            }
            i += 1;
        };
        p = i + 1;

        let size = match piece {
            Piece::Char(_) => 1,
            Piece::Str(s) => s.len(),
            Piece::Dec(v) => dec_digits((v as i64).unsigned_abs()) + usize::from(v < 0),
            Piece::Uns(v) => dec_digits(v as u64),
            Piece::Hex(v) => hex_digits(v),
        };

        if !left_justify {
            let pad = if zero_justify { b'0' } else { b' ' };
            for _ in size..width {
                if !put(write, stream, &[pad], &mut res) {
                    return res;
                }
            }
        }

        match piece {
            Piece::Char(c) => {
                if !put(write, stream, &[c], &mut res) {
                    return res;
                }
            }
            Piece::Str(s) => {
                if !put(write, stream, s, &mut res) {
                    return res;
                }
            }
            Piece::Dec(v) => {
                // zero padding precedes the sign
                if v < 0 && !put(write, stream, b"-", &mut res) {
                    return res;
                }
                if !put_decimal(write, stream, (v as i64).unsigned_abs(), &mut res) {
                    return res;
                }
            }
            Piece::Uns(v) => {
                if !put_decimal(write, stream, v as u64, &mut res) {
                    return res;
                }
            }
            Piece::Hex(v) => {
                let digits = hex_digits(v);
                for shift in (0..digits).rev() {
                    let digit = ((v >> (4 * shift)) & 0xf) as u8;
                    let c = if digit >= 10 { b'a' + digit - 10 } else { b'0' + digit };
                    if !put(write, stream, &[c], &mut res) {
                        return res;
                    }
                }
            }
        }

        if left_justify {
            for _ in size..width {
                if !put(write, stream, b" ", &mut res) {
                    return res;
                }
            }
        }
    }
}

fn put<W>(write: &mut W, stream: Word, buf: &[u8], res: &mut isize) -> bool
where
    W: FnMut(Word, &[u8]) -> isize,
{
    let n = write(stream, buf);
    if n < 0 {
        *res = n;
        return false;
    }
    *res += n;
    true
}

fn put_decimal<W>(write: &mut W, stream: Word, value: u64, res: &mut isize) -> bool
where
    W: FnMut(Word, &[u8]) -> isize,
{
    let mut buf = [0u8; 20];
    let mut end = buf.len();
    let mut v = value;
    loop {
        end -= 1;
        buf[end] = b'0' + (v % 10) as u8;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    put(write, stream, &buf[end..], res)
}

fn dec_digits(mut value: u64) -> usize {
    let mut n = 0;
    while value > 0 {
        n += 1;
        value /= 10;
    }
    n.max(1)
}

fn hex_digits(mut value: u32) -> usize {
    let mut n = 0;
    while value > 0 {
        n += 1;
        value /= 16;
    }
    n.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: &str, args: &[FmtArg]) -> (isize, String) {
        let mut out = Vec::new();
        let mut write = |_stream: Word, buf: &[u8]| {
            out.extend_from_slice(buf);
            buf.len() as isize
        };
        let res = cbprintf(&mut write, 1, format, args);
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn plain_text_and_percent_escape() {
        assert_eq!(render("hello\n", &[]), (6, "hello\n".to_string()));
        assert_eq!(render("100%%", &[]), (4, "100%".to_string()));
    }

    #[test]
    fn char_and_string() {
        assert_eq!(render("%c", &[FmtArg::Char(b'A')]).1, "A");
        assert_eq!(render("[%s]", &[FmtArg::Str("abc")]).1, "[abc]");
        assert_eq!(render("%5s", &[FmtArg::Str("abc")]).1, "  abc");
    }

    #[test]
    fn signed_and_unsigned_decimal() {
        assert_eq!(render("%d", &[FmtArg::Int(0)]).1, "0");
        assert_eq!(render("%d", &[FmtArg::Int(-12)]).1, "-12");
        assert_eq!(render("%u", &[FmtArg::Uint(4000000000)]).1, "4000000000");
        assert_eq!(
            render("box%d says hello!\n", &[FmtArg::Int(2)]).1,
            "box2 says hello!\n"
        );
    }

    #[test]
    fn hex() {
        assert_eq!(render("%x", &[FmtArg::Uint(0xbeef)]).1, "beef");
        assert_eq!(render("%x", &[FmtArg::Uint(0)]).1, "0");
        assert_eq!(render("0x%08x", &[FmtArg::Uint(0x1a2)]).1, "0x000001a2");
    }

    #[test]
    fn precision_truncates_strings() {
        assert_eq!(render("%.3s", &[FmtArg::Str("abcdef")]).1, "abc");
        assert_eq!(render("%.3s", &[FmtArg::Str("ab")]).1, "ab");
        assert_eq!(
            render("%.*s", &[FmtArg::Uint(2), FmtArg::Str("abcdef")]).1,
            "ab"
        );
        // a zero precision means unbounded
        assert_eq!(render("%.0s", &[FmtArg::Str("abc")]).1, "abc");
        // width pads the truncated length
        assert_eq!(render("%6.3s|", &[FmtArg::Str("abcdef")]).1, "   abc|");
    }

    #[test]
    fn width_and_justification() {
        assert_eq!(render("%5d", &[FmtArg::Int(42)]).1, "   42");
        assert_eq!(render("%05d", &[FmtArg::Int(42)]).1, "00042");
        // zero padding precedes the sign
        assert_eq!(render("%05d", &[FmtArg::Int(-12)]).1, "00-12");
        assert_eq!(render("%-5d|", &[FmtArg::Int(42)]).1, "42   |");
        assert_eq!(render("%*d", &[FmtArg::Uint(4), FmtArg::Int(7)]).1, "   7");
    }

    #[test]
    fn unknown_directive_renders_as_pointer() {
        let expected_width = 2 * core::mem::size_of::<usize>();
        let (_, out) = render("%p", &[FmtArg::Uint(0xab)]);
        assert_eq!(out.len(), expected_width);
        assert!(out.ends_with("ab"));
        assert!(out.starts_with('0'));
    }

    #[test]
    fn write_errors_propagate() {
        let mut write = |_stream: Word, _buf: &[u8]| -5isize;
        assert_eq!(cbprintf(&mut write, 1, "hi", &[]), -5);
    }

    #[test]
    fn exhausted_arguments_are_invalid() {
        assert_eq!(render("%d", &[]).0, Error::Inval.to_word() as isize);
        assert_eq!(render("%", &[]).0, Error::Inval.to_word() as isize);
        assert_eq!(
            render("%s", &[FmtArg::Int(1)]).0,
            Error::Inval.to_word() as isize
        );
    }
}
