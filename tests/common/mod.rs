//! Shared helpers for integration tests.

/// One-page document fact used by the extraction and live tests.
pub const FACT: &str = "The capital of Brazil is Brasília.";

/// True when the text carries the fixture's fact, accented or not.
/// Models and extractors differ on whether the í survives.
pub fn mentions_brasilia(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("brasília") || lower.contains("brasilia")
}

/// Minimal valid PDF with one page of text. The font uses WinAnsiEncoding
/// and the text is written as Latin-1 bytes, so accented characters like
/// the í in Brasília survive extraction. Body first, then an xref with
/// correct byte offsets so the parser accepts it.
pub fn minimal_pdf_with_text(text: &str) -> Vec<u8> {
    let mut stream: Vec<u8> = b"BT /F1 12 Tf 72 700 Td (".to_vec();
    stream.extend(text.chars().map(|c| {
        let code = c as u32;
        if code < 256 {
            code as u8
        } else {
            b'?'
        }
    }));
    stream.extend_from_slice(b") Tj ET\n");

    let mut out = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n");
    let o1 = out.len();
    out.extend_from_slice(b"1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
    let o2 = out.len();
    out.extend_from_slice(b"2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
    let o3 = out.len();
    out.extend_from_slice(b"3 0 obj << /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >> endobj\n");
    let o4 = out.len();
    out.extend_from_slice(format!("4 0 obj << /Length {} >> stream\n", stream.len()).as_bytes());
    out.extend_from_slice(&stream);
    out.extend_from_slice(b"endstream endobj\n");
    let o5 = out.len();
    out.extend_from_slice(
        b"5 0 obj << /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >> endobj\n",
    );
    let xref_start = out.len();
    out.extend_from_slice(b"xref\n0 6\n");
    out.extend_from_slice(format!("{:010} 65535 f \n", 0).as_bytes());
    out.extend_from_slice(format!("{:010} 00000 n \n", o1).as_bytes());
    out.extend_from_slice(format!("{:010} 00000 n \n", o2).as_bytes());
    out.extend_from_slice(format!("{:010} 00000 n \n", o3).as_bytes());
    out.extend_from_slice(format!("{:010} 00000 n \n", o4).as_bytes());
    out.extend_from_slice(format!("{:010} 00000 n \n", o5).as_bytes());
    out.extend_from_slice(b"trailer << /Size 6 /Root 1 0 R >>\nstartxref\n");
    out.extend_from_slice(format!("{}\n", xref_start).as_bytes());
    out.extend_from_slice(b"%%EOF\n");
    out
}
