//! Target-language source emission.

mod cxx;

pub use cxx::CxxEmitter;

use nabla_passes::AnnotationTable;

/// Selects an emitter by language tag. `"cxx"`, `"c++"` and `"cpp"` all
/// select the C++ emitter.
pub fn create<'a, 't>(
    lang: &str,
    annotations: &'t AnnotationTable<'a>,
) -> Option<CxxEmitter<'a, 't>> {
    match lang {
        "cxx" | "c++" | "cpp" => Some(CxxEmitter::new(annotations)),
        _ => None,
    }
}

/// A growing source buffer with indentation helpers, shared by language
/// emitters.
#[derive(Default)]
pub struct CodeWriter {
    indent: usize,
    source: String,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        if self.indent > 0 {
            self.indent -= 1;
        }
    }

    /// Appends a full line at the current indentation.
    pub fn add_line(&mut self, line: &str) {
        for _i in 0..self.indent {
            self.source.push_str("  ");
        }
        self.source.push_str(line);
        self.source.push('\n');
    }

    /// Appends text with no indentation or terminator.
    pub fn write(&mut self, text: &str) {
        self.source.push_str(text);
    }

    pub fn newline(&mut self) {
        self.source.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indentation() {
        let mut writer = CodeWriter::new();
        writer.add_line("a {");
        writer.indent();
        writer.add_line("b");
        writer.dedent();
        writer.add_line("}");
        assert_eq!(writer.source(), "a {\n  b\n}\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut writer = CodeWriter::new();
        writer.dedent();
        writer.add_line("a");
        assert_eq!(writer.source(), "a\n");
    }

    #[test]
    fn test_write_and_newline() {
        let mut writer = CodeWriter::new();
        writer.write("a");
        writer.write("b");
        writer.newline();
        assert_eq!(writer.source(), "ab\n");
    }
}
