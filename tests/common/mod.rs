use proposal_pdf::ProposalRecord;

/// Reference scenario used across the integration tests.
pub fn sample_record() -> ProposalRecord {
    ProposalRecord {
        client_name: "Jordan Meyer".into(),
        client_address: "14 Quay Street\nHarbourside\nBristol BS1 4DB".into(),
        proposal_date: "12 March 2026".into(),
        investment_amount: 150_000.0,
        target_return: 72.0,
        time_horizon: 3,
        year1_dividend: 1.440,
        year2_dividend: 1.888,
        year3_dividend: 2.378,
    }
}

/// Encode a small solid-color PNG in memory.
pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("png encode");
    out.into_inner()
}

/// Number of page objects in a serialized PDF. `/Page` also occurs as a
/// prefix of every `/Pages` (the tree node and the catalog reference), so
/// subtract those.
pub fn page_object_count(bytes: &[u8]) -> usize {
    count_occurrences(bytes, b"/Page") - count_occurrences(bytes, b"/Pages")
}

/// Number of image XObjects (`/Subtype` value `/Image`; soft masks included).
pub fn image_object_count(bytes: &[u8]) -> usize {
    count_occurrences(bytes, b"/Image")
}

fn count_occurrences(haystack: &[u8], needle: &[u8]) -> usize {
    haystack.windows(needle.len()).filter(|w| *w == needle).count()
}
