//! Minimal indented XML writer for the report schemas.

/// Characters outside the XML 1.0 `Char` production (C0 controls other than
/// tab, newline and carriage return, plus U+FFFE and U+FFFF) cannot appear
/// in a document, escaped or not. They become U+FFFD.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

pub fn xml_sanitize(input: &str) -> String {
    input
        .chars()
        .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
        .collect()
}

pub fn xml_escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
    out
}

#[derive(Debug)]
pub struct XmlWriter {
    out: String,
    open: Vec<&'static str>,
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlWriter {
    pub fn new() -> Self {
        Self {
            out: String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"),
            open: Vec::new(),
        }
    }

    fn start_tag(&mut self, tag: &str, attrs: &[(&str, String)]) {
        self.out.push_str(&"  ".repeat(self.open.len()));
        self.out.push('<');
        self.out.push_str(tag);
        for (name, value) in attrs {
            self.out.push_str(&format!(" {name}=\"{}\"", xml_escape(value)));
        }
    }

    pub fn open(&mut self, tag: &'static str, attrs: &[(&str, String)]) -> &mut Self {
        self.start_tag(tag, attrs);
        self.out.push_str(">\n");
        self.open.push(tag);
        self
    }

    /// Self-closing element.
    pub fn empty(&mut self, tag: &str, attrs: &[(&str, String)]) -> &mut Self {
        self.start_tag(tag, attrs);
        self.out.push_str("/>\n");
        self
    }

    /// Element with escaped text content.
    pub fn text(&mut self, tag: &str, attrs: &[(&str, String)], text: &str) -> &mut Self {
        self.start_tag(tag, attrs);
        self.out.push('>');
        self.out.push_str(&xml_escape(text));
        self.out.push_str(&format!("</{tag}>\n"));
        self
    }

    /// Element with a CDATA section. `]]>` inside the text is split.
    pub fn cdata(&mut self, tag: &str, text: &str) -> &mut Self {
        self.start_tag(tag, &[]);
        self.out.push_str("><![CDATA[");
        self.out
            .push_str(&xml_sanitize(text).replace("]]>", "]]]]><![CDATA[>"));
        self.out.push_str(&format!("]]></{tag}>\n"));
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if let Some(tag) = self.open.pop() {
            self.out.push_str(&"  ".repeat(self.open.len()));
            self.out.push_str(&format!("</{tag}>\n"));
        }
        self
    }

    /// Closes every open element and returns the document.
    pub fn finish(mut self) -> String {
        while !self.open.is_empty() {
            self.close();
        }
        self.out
    }
}
