use std::fmt;

/// Identifies one draw results page.
///
/// The parts are joined verbatim; nothing is validated or normalised, so a
/// malformed base URL surfaces as a navigation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawTarget {
    pub base_url: String,
    pub slug: String,
    pub draw_no: String,
}

impl DrawTarget {
    pub fn new(
        base_url: impl Into<String>,
        slug: impl Into<String>,
        draw_no: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            slug: slug.into(),
            draw_no: draw_no.into(),
        }
    }

    /// The navigable address `base/slug/drawNo`.
    ///
    /// ```
    /// use drawpage_scraper::DrawTarget;
    ///
    /// let target = DrawTarget::new("http://x.test", "abc", "42");
    /// assert_eq!(target.address(), "http://x.test/abc/42");
    /// ```
    pub fn address(&self) -> String {
        format!("{}/{}/{}", self.base_url, self.slug, self.draw_no)
    }
}

impl fmt::Display for DrawTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_parts_literally() {
        let cases = [
            (("http://x.test", "abc", "42"), "http://x.test/abc/42"),
            (("http://x.test/", "abc", "42"), "http://x.test//abc/42"),
            (("", "", ""), "//"),
            (("not a url", "a b", "0042"), "not a url/a b/0042"),
        ];
        for ((base, slug, draw), expected) in cases {
            assert_eq!(DrawTarget::new(base, slug, draw).address(), expected);
        }
    }

    #[test]
    fn display_matches_address() {
        let target = DrawTarget::new("https://draws.test/results", "powerball", "1234");
        assert_eq!(target.to_string(), target.address());
    }
}
