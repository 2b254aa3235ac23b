//! Encoding detection for XML input.
//!
//! quick-xml only parses ASCII-compatible bytes. UTF-16 documents, recognized
//! by their byte order mark or by the `<?` of the declaration (XML 1.0
//! appendix F), are transcoded to UTF-8 before they reach the parser. A UTF-8
//! byte order mark is dropped.

use std::io::{self, BufRead, Read};

use encoding_rs::{Decoder, DecoderResult, Encoding, UTF_16BE, UTF_16LE, UTF_8};
use tracing::debug;

/// Buffered input that yields UTF-8 regardless of the document's encoding.
pub(crate) struct XmlInput<R> {
    input: R,
    sniffed: bool,
    decoder: Option<Decoder>,
    output: Vec<u8>,
    position: usize,
    finished: bool,
}

impl<R: BufRead> XmlInput<R> {
    pub(crate) fn new(input: R) -> Self {
        Self {
            input,
            sniffed: false,
            decoder: None,
            output: Vec::new(),
            position: 0,
            finished: false,
        }
    }

    /// Look at the first bytes and pick a decoder.
    fn sniff(&mut self) -> io::Result<()> {
        if self.sniffed {
            return Ok(());
        }

        let head = self.input.fill_buf()?;
        let (encoding, bom_length) = match Encoding::for_bom(head) {
            Some(found) => found,
            None => match head.get(..4) {
                Some([0x3C, 0x00, 0x3F, 0x00]) => (UTF_16LE, 0),
                Some([0x00, 0x3C, 0x00, 0x3F]) => (UTF_16BE, 0),
                _ => (UTF_8, 0),
            },
        };
        self.input.consume(bom_length);

        if encoding != UTF_8 {
            debug!(encoding = encoding.name(), "transcoding XML input to UTF-8");
            self.decoder = Some(encoding.new_decoder_without_bom_handling());
        }
        self.sniffed = true;
        Ok(())
    }

    /// Decode input until at least one byte of UTF-8 is available or the input ends.
    fn transcode(&mut self) -> io::Result<()> {
        let Some(decoder) = self.decoder.as_mut() else {
            return Ok(());
        };

        self.output.clear();
        self.position = 0;
        while self.output.is_empty() && !self.finished {
            let chunk = self.input.fill_buf()?;
            let last = chunk.is_empty();
            let capacity = decoder
                .max_utf8_buffer_length_without_replacement(chunk.len())
                .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "XML input chunk too large"))?;

            self.output.resize(capacity, 0);
            let (result, read, written) =
                decoder.decode_to_utf8_without_replacement(chunk, &mut self.output, last);
            self.output.truncate(written);
            self.input.consume(read);

            if let DecoderResult::Malformed(_, _) = result {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!("invalid {} sequence in XML input", decoder.encoding().name()),
                ));
            }
            self.finished = last;
        }
        Ok(())
    }
}

impl<R: BufRead> BufRead for XmlInput<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.sniff()?;
        if self.decoder.is_none() {
            return self.input.fill_buf();
        }
        if self.position == self.output.len() {
            self.transcode()?;
        }
        Ok(&self.output[self.position..])
    }

    fn consume(&mut self, amount: usize) {
        if self.decoder.is_some() {
            self.position = (self.position + amount).min(self.output.len());
        } else {
            self.input.consume(amount);
        }
    }
}

impl<R: BufRead> Read for XmlInput<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let available = self.fill_buf()?;
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.consume(n);
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_to_string(bytes: &[u8]) -> io::Result<String> {
        let mut text = String::new();
        XmlInput::new(bytes).read_to_string(&mut text)?;
        Ok(text)
    }

    fn utf16le(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_le_bytes).collect()
    }

    fn utf16be(text: &str) -> Vec<u8> {
        text.encode_utf16().flat_map(u16::to_be_bytes).collect()
    }

    #[test]
    fn test_utf8_passes_through() {
        assert_eq!(read_to_string(b"<A/>").unwrap(), "<A/>");
        assert_eq!(read_to_string(b"").unwrap(), "");
    }

    #[test]
    fn test_utf8_bom_is_dropped() {
        assert_eq!(read_to_string(b"\xEF\xBB\xBF<A/>").unwrap(), "<A/>");
    }

    #[test]
    fn test_utf16_with_bom() {
        assert_eq!(read_to_string(&utf16le("\u{feff}<Ä/>")).unwrap(), "<Ä/>");
        assert_eq!(read_to_string(&utf16be("\u{feff}<Ä/>")).unwrap(), "<Ä/>");
    }

    #[test]
    fn test_utf16_without_bom() {
        assert_eq!(read_to_string(&utf16le("<?xml?><A/>")).unwrap(), "<?xml?><A/>");
        assert_eq!(read_to_string(&utf16be("<?xml?><A/>")).unwrap(), "<?xml?><A/>");
    }

    #[test]
    fn test_utf16_across_small_buffers() {
        let bytes = utf16le("\u{feff}<Outer><\u{1F600}/></Outer>");
        let mut text = String::new();
        XmlInput::new(io::BufReader::with_capacity(3, bytes.as_slice()))
            .read_to_string(&mut text)
            .unwrap();
        assert_eq!(text, "<Outer><\u{1F600}/></Outer>");
    }

    #[test]
    fn test_truncated_utf16_is_invalid_data() {
        let mut bytes = utf16le("\u{feff}<A/>");
        bytes.push(0x3C);
        let err = read_to_string(&bytes).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
