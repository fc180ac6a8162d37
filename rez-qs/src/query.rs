//! Query string parsing and building.
//!
//! Values are percent-encoded except for unreserved characters and `,`,
//! which stays literal so ranges and selections read as `min,max`.

/// Split a query string into decoded `(key, value)` pairs, in order.
///
/// A leading `?` is ignored, as are empty segments. A segment without `=`
/// yields an empty value.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        return Vec::new();
    }
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

/// Join `(key, value)` pairs into a query string without a leading `?`.
pub fn build_query<'a, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn is_literal(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~' | b',')
}

pub fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        if is_literal(b) {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    out
}

/// Decode `%XX` escapes and `+`. Malformed escapes are kept verbatim.
pub fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .and_then(|h| std::str::from_utf8(h).ok())
                    .and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let pairs = parse_query("?areaId=KEN&resourceId=Off-Shore+Wind&&maxLCOE=7,25&flag");
        assert_eq!(
            pairs,
            vec![
                ("areaId".to_string(), "KEN".to_string()),
                ("resourceId".to_string(), "Off-Shore Wind".to_string()),
                ("maxLCOE".to_string(), "7,25".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
    }

    #[test]
    fn test_encoding() {
        assert_eq!(encode_component("Solar PV"), "Solar%20PV");
        assert_eq!(encode_component("0.2,0.8"), "0.2,0.8");
        assert_eq!(encode_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(decode_component("Solar%20PV"), "Solar PV");
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz"), "%zz");
        assert_eq!(decode_component("%C3%A9"), "é");
    }

    #[test]
    fn test_build_query() {
        let qs = build_query([("resourceId", "Solar PV"), ("maxZoneScore", "0,1")]);
        assert_eq!(qs, "resourceId=Solar%20PV&maxZoneScore=0,1");
        assert_eq!(parse_query(&qs)[0].1, "Solar PV");
    }
}
