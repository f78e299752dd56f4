// SOAP framing for the ePOS-Print service

/// Wrap an `<epos-print>` document in the SOAP envelope the service expects
pub fn wrap_soap(document: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">"#,
            "<s:Body>{}</s:Body></s:Envelope>"
        ),
        document
    )
}

/// Parsed `<response .../>` element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EposResponse {
    pub success: bool,
    pub code: String,
    pub status: Option<String>,
    pub battery: Option<String>,
}

/// Extract the `<response>` element from a service reply.
/// Returns `None` when the body carries no response element.
pub fn parse_response(body: &str) -> Option<EposResponse> {
    let start = find_response_tag(body)?;
    let rest = &body[start..];
    let end = rest.find('>')?;
    let tag = rest[..end].trim_end_matches('/');

    Some(EposResponse {
        success: attribute(tag, "success").as_deref() == Some("true"),
        code: attribute(tag, "code").unwrap_or_default(),
        status: attribute(tag, "status").filter(|s| !s.is_empty()),
        battery: attribute(tag, "battery").filter(|s| !s.is_empty()),
    })
}

// Accepts both `<response ` and a namespace-prefixed `<x:response `
fn find_response_tag(body: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(pos) = body[offset..].find('<') {
        let at = offset + pos;
        let name: String = body[at + 1..]
            .chars()
            .take_while(|c| !c.is_whitespace() && *c != '>' && *c != '/')
            .collect();
        let local = name.rsplit(':').next().unwrap_or(&name);
        if local == "response" {
            return Some(at);
        }
        offset = at + 1;
    }
    None
}

fn attribute(tag: &str, name: &str) -> Option<String> {
    let needle = format!("{}=", name);
    let mut search = tag;
    loop {
        let pos = search.find(&needle)?;
        let preceded_by_space = search[..pos]
            .chars()
            .last()
            .map(char::is_whitespace)
            .unwrap_or(false);
        let after = &search[pos + needle.len()..];
        if preceded_by_space {
            let quote = after.chars().next()?;
            if quote != '"' && quote != '\'' {
                return None;
            }
            let value = &after[1..];
            let close = value.find(quote)?;
            return Some(unescape(&value[..close]));
        }
        search = after;
    }
}

fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_soap() {
        let wrapped = wrap_soap("<epos-print/>");
        assert!(wrapped.starts_with(r#"<?xml version="1.0" encoding="utf-8"?><s:Envelope"#));
        assert!(wrapped.ends_with("<s:Body><epos-print/></s:Body></s:Envelope>"));
    }

    #[test]
    fn test_parse_success_response() {
        let body = r#"<?xml version="1.0" encoding="UTF-8"?><s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><response success="true" code="" status="251658262" battery="0" xmlns="http://www.epson-pos.com/schemas/2011/03/epos-print"></response></s:Body></s:Envelope>"#;
        let response = parse_response(body).unwrap();
        assert!(response.success);
        assert_eq!(response.code, "");
        assert_eq!(response.status.as_deref(), Some("251658262"));
        assert_eq!(response.battery.as_deref(), Some("0"));
    }

    #[test]
    fn test_parse_failure_response() {
        let body = r#"<response success="false" code="EPTR_COVER_OPEN" status="" />"#;
        let response = parse_response(body).unwrap();
        assert!(!response.success);
        assert_eq!(response.code, "EPTR_COVER_OPEN");
        assert_eq!(response.status, None);
        assert_eq!(response.battery, None);
    }

    #[test]
    fn test_prefixed_and_missing_response() {
        assert!(parse_response(r#"<e:response success="true" code="OK"/>"#).unwrap().success);
        assert_eq!(parse_response("<html>busy</html>"), None);
        // `responses` is a different element
        assert_eq!(parse_response(r#"<responses success="true"/>"#), None);
    }
}
