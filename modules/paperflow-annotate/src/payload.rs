/// Locates the structured payload inside a free-text model reply.
pub trait PayloadExtractor: Send + Sync {
    fn extract<'a>(&self, reply: &'a str) -> Option<&'a str>;
}

/// Lenient extraction: everything from the first `{` to the last `}`.
///
/// Models like to wrap JSON in prose or code fences; this ignores both.
/// Nested objects are fine, two sibling objects are not (the span covers
/// both and fails to parse).
#[derive(Debug, Default, Clone, Copy)]
pub struct BraceSpanExtractor;

impl PayloadExtractor for BraceSpanExtractor {
    fn extract<'a>(&self, reply: &'a str) -> Option<&'a str> {
        let start = reply.find('{')?;
        let end = reply.rfind('}')?;
        (end > start).then(|| &reply[start..=end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_surrounding_prose_and_fences() {
        let reply = "Sure! Here it is:\n```json\n{\"a\": {\"b\": 1}}\n```\nHope that helps.";
        assert_eq!(BraceSpanExtractor.extract(reply), Some("{\"a\": {\"b\": 1}}"));
    }

    #[test]
    fn no_braces_or_wrong_order() {
        assert_eq!(BraceSpanExtractor.extract("no payload here"), None);
        assert_eq!(BraceSpanExtractor.extract("} backwards {"), None);
        assert_eq!(BraceSpanExtractor.extract("{ unterminated"), None);
    }
}
