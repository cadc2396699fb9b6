mod layout;
mod table;

use std::io::BufReader;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{ASCENDER_RATIO, FontEntry, FontSet, to_winansi_bytes};
use crate::model::{Block, ProposalAssets, ProposalRecord};
use crate::template::{COMPANY_NAME, COVER_BOILERPLATE, FOOTER_LINES};

use layout::{render_lines, wrap_text};
use table::render_table;

// ISO A4 in points, origin bottom-left.
pub(crate) const PAGE_WIDTH: f32 = 595.28;
pub(crate) const PAGE_HEIGHT: f32 = 841.89;

pub(crate) const MARGIN_LEFT: f32 = 56.7;
pub(crate) const MARGIN_RIGHT: f32 = 56.7;
pub(crate) const TEXT_WIDTH: f32 = PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;

/// First usable baseline box top on a fresh page, below the logo band.
pub(crate) const CONTENT_TOP: f32 = 762.0;
/// No block may start below this; the footer block lives underneath.
pub(crate) const CONTENT_BOTTOM: f32 = 96.0;

const BODY_SIZE: f32 = 10.5;
const BODY_LINE_H: f32 = 14.5;
const HEADING_SIZE: f32 = 13.0;
const HEADING_LINE_H: f32 = 18.0;
const HEADING_GAP_BEFORE: f32 = 14.0;
const HEADING_GAP_AFTER: f32 = 6.0;
const PARA_GAP: f32 = 8.0;
const LIST_INDENT: f32 = 16.0;
const LIST_ITEM_GAP: f32 = 4.0;
const TABLE_ROW_HEIGHT: f32 = 22.0;
const DISCLAIMER_SIZE: f32 = 8.0;
const DISCLAIMER_LINE_H: f32 = 11.0;
const FOOTER_SIZE: f32 = 7.5;
const FOOTER_TOP_BASELINE: f32 = 68.0;
const FOOTER_LINE_H: f32 = 9.5;
const LOGO_HEIGHT: f32 = 30.0;
const LOGO_TOP: f32 = 826.0;
const SIGNATURE_IMAGE_HEIGHT: f32 = 42.0;

/// An image XObject registered with the writer, keyed by its resource name.
pub(crate) struct EmbeddedAsset {
    pdf_name: String,
    pixel_width: u32,
    pixel_height: u32,
}

impl EmbeddedAsset {
    fn aspect(&self) -> f32 {
        self.pixel_width as f32 / self.pixel_height.max(1) as f32
    }
}

/// Owns the content pages and the vertical cursor. Every page it opens gets
/// the running decorations (footer block, header logo) before any content.
pub(crate) struct PageFlow<'a> {
    fonts: &'a FontSet,
    logo: Option<&'a EmbeddedAsset>,
    pages: Vec<Content>,
    pub(crate) cursor: f32,
}

impl<'a> PageFlow<'a> {
    pub(crate) fn new(fonts: &'a FontSet, logo: Option<&'a EmbeddedAsset>) -> Self {
        Self {
            fonts,
            logo,
            pages: Vec::new(),
            cursor: CONTENT_BOTTOM,
        }
    }

    pub(crate) fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub(crate) fn start_page(&mut self) {
        let mut content = Content::new();
        draw_footer(&mut content, self.fonts);
        if let Some(logo) = self.logo {
            draw_logo(&mut content, logo);
        }
        self.pages.push(content);
        self.cursor = CONTENT_TOP;
        log::debug!("content page {} opened", self.pages.len());
    }

    /// The only page-break policy: a reservation check before drawing.
    /// Returns the (possibly reset) cursor.
    pub(crate) fn ensure_space(&mut self, needed: f32) -> f32 {
        if self.pages.is_empty() || self.cursor - needed < CONTENT_BOTTOM {
            self.start_page();
        }
        self.cursor
    }

    fn content(&mut self) -> &mut Content {
        self.pages.last_mut().expect("no page started")
    }

    fn finish(self) -> Vec<Content> {
        self.pages
    }
}

fn draw_footer(content: &mut Content, fonts: &FontSet) {
    content.set_fill_gray(0.4);
    for (i, line) in FOOTER_LINES.iter().enumerate() {
        let width = fonts.regular.text_width(line, FOOTER_SIZE);
        let x = (PAGE_WIDTH - width) / 2.0;
        let y = FOOTER_TOP_BASELINE - i as f32 * FOOTER_LINE_H;
        content.begin_text();
        content.set_font(Name(fonts.regular.pdf_name.as_bytes()), FOOTER_SIZE);
        content.next_line(x, y);
        content.show(Str(&to_winansi_bytes(line)));
        content.end_text();
    }
    content.set_fill_gray(0.0);
}

fn draw_logo(content: &mut Content, logo: &EmbeddedAsset) {
    let display_w = logo.aspect() * LOGO_HEIGHT;
    let x = PAGE_WIDTH - MARGIN_RIGHT - display_w;
    let y = LOGO_TOP - LOGO_HEIGHT;
    content.save_state();
    content.transform([display_w, 0.0, 0.0, LOGO_HEIGHT, x, y]);
    content.x_object(Name(logo.pdf_name.as_bytes()));
    content.restore_state();
}

fn draw_centered_line(
    content: &mut Content,
    font: &FontEntry,
    font_size: f32,
    text: &str,
    baseline_y: f32,
) {
    let width = font.text_width(text, font_size);
    content.begin_text();
    content.set_font(Name(font.pdf_name.as_bytes()), font_size);
    content.next_line((PAGE_WIDTH - width) / 2.0, baseline_y);
    content.show(Str(&to_winansi_bytes(text)));
    content.end_text();
}

/// Cover page: supplied art scaled to fit and centered, or a text-only title
/// block when no art was given.
fn draw_cover(
    content: &mut Content,
    record: &ProposalRecord,
    cover: Option<&EmbeddedAsset>,
    fonts: &FontSet,
) {
    if let Some(img) = cover {
        let scale = (PAGE_WIDTH / img.pixel_width.max(1) as f32)
            .min(PAGE_HEIGHT / img.pixel_height.max(1) as f32);
        let dw = img.pixel_width as f32 * scale;
        let dh = img.pixel_height as f32 * scale;
        content.save_state();
        content.transform([dw, 0.0, 0.0, dh, (PAGE_WIDTH - dw) / 2.0, (PAGE_HEIGHT - dh) / 2.0]);
        content.x_object(Name(img.pdf_name.as_bytes()));
        content.restore_state();
        return;
    }

    draw_centered_line(content, &fonts.bold, 24.0, COMPANY_NAME, 540.0);

    content.save_state();
    content.set_line_width(1.0);
    content.move_to(PAGE_WIDTH / 2.0 - 90.0, 524.0);
    content.line_to(PAGE_WIDTH / 2.0 + 90.0, 524.0);
    content.stroke();
    content.restore_state();

    draw_centered_line(content, &fonts.regular, 15.0, "Investment Proposal", 494.0);
    draw_centered_line(
        content,
        &fonts.regular,
        11.5,
        &format!("Prepared for {}", record.client_name),
        462.0,
    );
    draw_centered_line(content, &fonts.regular, 10.5, &record.proposal_date, 444.0);

    content.set_fill_gray(0.4);
    for (i, line) in COVER_BOILERPLATE.iter().enumerate() {
        draw_centered_line(content, &fonts.regular, 9.0, line, 168.0 - i as f32 * 13.0);
    }
    content.set_fill_gray(0.0);
}

/// One generic interpreter for the narrative block list. Every block (or list
/// item) reserves its vertical extent through the page flow before drawing.
fn draw_block(
    flow: &mut PageFlow,
    fonts: &FontSet,
    block: &Block,
    signature: Option<&EmbeddedAsset>,
) {
    match block {
        Block::Heading(text) => {
            let lines = wrap_text(text, &fonts.bold, HEADING_SIZE, TEXT_WIDTH);
            let h = lines.len() as f32 * HEADING_LINE_H;
            // Reserve two body lines so a heading is never stranded at a page
            // bottom with its section on the next page.
            let pages_before = flow.page_count();
            let mut y = flow.ensure_space(HEADING_GAP_BEFORE + h + HEADING_GAP_AFTER + 2.0 * BODY_LINE_H);
            if flow.page_count() == pages_before {
                y -= HEADING_GAP_BEFORE;
            }
            let after = render_lines(
                flow.content(),
                &lines,
                &fonts.bold,
                HEADING_SIZE,
                false,
                MARGIN_LEFT,
                TEXT_WIDTH,
                y,
                HEADING_LINE_H,
            );
            flow.cursor = after - HEADING_GAP_AFTER;
        }
        Block::Paragraph(text) => {
            let lines = wrap_text(text, &fonts.regular, BODY_SIZE, TEXT_WIDTH);
            if lines.is_empty() {
                return;
            }
            let h = lines.len() as f32 * BODY_LINE_H;
            let y = flow.ensure_space(h);
            let after = render_lines(
                flow.content(),
                &lines,
                &fonts.regular,
                BODY_SIZE,
                true,
                MARGIN_LEFT,
                TEXT_WIDTH,
                y,
                BODY_LINE_H,
            );
            flow.cursor = after - PARA_GAP;
        }
        Block::Lines(items) => {
            for item in items {
                let lines = wrap_text(item, &fonts.regular, BODY_SIZE, TEXT_WIDTH);
                if lines.is_empty() {
                    continue;
                }
                let h = lines.len() as f32 * BODY_LINE_H;
                let y = flow.ensure_space(h);
                flow.cursor = render_lines(
                    flow.content(),
                    &lines,
                    &fonts.regular,
                    BODY_SIZE,
                    false,
                    MARGIN_LEFT,
                    TEXT_WIDTH,
                    y,
                    BODY_LINE_H,
                );
            }
            flow.cursor -= PARA_GAP;
        }
        Block::Bullets(items) => {
            for item in items {
                draw_list_item(flow, fonts, "\u{2022}", item);
            }
            flow.cursor -= PARA_GAP - LIST_ITEM_GAP;
        }
        Block::Numbered(items) => {
            for (i, item) in items.iter().enumerate() {
                draw_list_item(flow, fonts, &format!("{}.", i + 1), item);
            }
            flow.cursor -= PARA_GAP - LIST_ITEM_GAP;
        }
        Block::Table(table) => {
            let h = table.rows.len() as f32 * TABLE_ROW_HEIGHT;
            let y = flow.ensure_space(h);
            let bottom = render_table(
                flow.content(),
                fonts,
                &table.rows,
                &table.col_widths,
                MARGIN_LEFT,
                y,
                TABLE_ROW_HEIGHT,
            );
            flow.cursor = bottom - PARA_GAP;
        }
        Block::Spacer(gap) => {
            flow.cursor -= gap;
        }
        Block::Signature(lines) => {
            let image_h = if signature.is_some() {
                SIGNATURE_IMAGE_HEIGHT + 6.0
            } else {
                0.0
            };
            let h = image_h + lines.len() as f32 * BODY_LINE_H;
            let mut y = flow.ensure_space(h);
            if let Some(img) = signature {
                let display_w = img.aspect() * SIGNATURE_IMAGE_HEIGHT;
                let content = flow.content();
                content.save_state();
                content.transform([
                    display_w,
                    0.0,
                    0.0,
                    SIGNATURE_IMAGE_HEIGHT,
                    MARGIN_LEFT,
                    y - SIGNATURE_IMAGE_HEIGHT,
                ]);
                content.x_object(Name(img.pdf_name.as_bytes()));
                content.restore_state();
                y -= image_h;
            }
            for line in lines {
                let wrapped = wrap_text(line, &fonts.regular, BODY_SIZE, TEXT_WIDTH);
                if wrapped.is_empty() {
                    continue;
                }
                y = render_lines(
                    flow.content(),
                    &wrapped,
                    &fonts.regular,
                    BODY_SIZE,
                    false,
                    MARGIN_LEFT,
                    TEXT_WIDTH,
                    y,
                    BODY_LINE_H,
                );
            }
            flow.cursor = y;
        }
        Block::Disclaimer(text) => {
            let lines = wrap_text(text, &fonts.oblique, DISCLAIMER_SIZE, TEXT_WIDTH);
            if lines.is_empty() {
                return;
            }
            let h = lines.len() as f32 * DISCLAIMER_LINE_H;
            let pages_before = flow.page_count();
            let mut y = flow.ensure_space(HEADING_GAP_BEFORE + h);
            if flow.page_count() == pages_before {
                y -= HEADING_GAP_BEFORE;
            }
            let content = flow.content();
            content.set_fill_gray(0.45);
            let after = render_lines(
                content,
                &lines,
                &fonts.oblique,
                DISCLAIMER_SIZE,
                false,
                MARGIN_LEFT,
                TEXT_WIDTH,
                y,
                DISCLAIMER_LINE_H,
            );
            flow.content().set_fill_gray(0.0);
            flow.cursor = after;
        }
    }
}

fn draw_list_item(flow: &mut PageFlow, fonts: &FontSet, label: &str, text: &str) {
    let lines = wrap_text(text, &fonts.regular, BODY_SIZE, TEXT_WIDTH - LIST_INDENT);
    if lines.is_empty() {
        return;
    }
    let h = lines.len() as f32 * BODY_LINE_H;
    let y = flow.ensure_space(h + LIST_ITEM_GAP);

    let content = flow.content();
    content.begin_text();
    content.set_font(Name(fonts.regular.pdf_name.as_bytes()), BODY_SIZE);
    content.next_line(MARGIN_LEFT + 2.0, y - BODY_SIZE * ASCENDER_RATIO);
    content.show(Str(&to_winansi_bytes(label)));
    content.end_text();

    let after = render_lines(
        content,
        &lines,
        &fonts.regular,
        BODY_SIZE,
        false,
        MARGIN_LEFT + LIST_INDENT,
        TEXT_WIDTH - LIST_INDENT,
        y,
        BODY_LINE_H,
    );
    flow.cursor = after - LIST_ITEM_GAP;
}

fn embed_png(
    pdf: &mut Pdf,
    data: &[u8],
    xobj_ref: Ref,
    alloc: &mut impl FnMut() -> Ref,
) -> Option<(u32, u32)> {
    let cursor = std::io::Cursor::new(data);
    let reader = image::ImageReader::with_format(BufReader::new(cursor), image::ImageFormat::Png);
    let decoded = reader.decode().ok()?;
    let rgba: image::RgbaImage = decoded.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    Some((w, h))
}

fn embed_jpeg(pdf: &mut Pdf, data: &[u8], xobj_ref: Ref) -> Option<(u32, u32)> {
    let cursor = std::io::Cursor::new(data);
    let reader = image::ImageReader::with_format(BufReader::new(cursor), image::ImageFormat::Jpeg);
    let (w, h) = reader.into_dimensions().ok()?;

    let mut xobj = pdf.image_xobject(xobj_ref, data);
    xobj.filter(Filter::DctDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    Some((w, h))
}

/// Register caller-supplied image bytes as an XObject. A decode failure is
/// never fatal: it logs a warning and the document degrades (text cover,
/// omitted logo or signature).
fn embed_image(
    pdf: &mut Pdf,
    data: &[u8],
    role: &str,
    alloc: &mut impl FnMut() -> Ref,
    image_xobjects: &mut Vec<(String, Ref)>,
) -> Option<EmbeddedAsset> {
    let xobj_ref = alloc();
    let pdf_name = format!("Im{}", image_xobjects.len() + 1);

    let dims = if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        embed_png(pdf, data, xobj_ref, alloc)
    } else if data.starts_with(&[0xFF, 0xD8]) {
        embed_jpeg(pdf, data, xobj_ref)
    } else {
        None
    };

    match dims {
        Some((pixel_width, pixel_height)) => {
            image_xobjects.push((pdf_name.clone(), xobj_ref));
            Some(EmbeddedAsset {
                pdf_name,
                pixel_width,
                pixel_height,
            })
        }
        None => {
            log::warn!("{role} image could not be decoded; continuing without it");
            None
        }
    }
}

/// Assemble the full document: cover page, content pages driven by the block
/// list, page tree and compressed content streams. Returns the serialized
/// bytes and the physical page count.
pub(crate) fn render(
    record: &ProposalRecord,
    blocks: &[Block],
    assets: &ProposalAssets,
) -> Result<(Vec<u8>, usize), Error> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    let fonts = FontSet::register(&mut pdf, &mut alloc);

    let mut image_xobjects: Vec<(String, Ref)> = Vec::new();
    let cover = assets
        .cover
        .as_deref()
        .and_then(|d| embed_image(&mut pdf, d, "cover", &mut alloc, &mut image_xobjects));
    let logo = assets
        .logo
        .as_deref()
        .and_then(|d| embed_image(&mut pdf, d, "logo", &mut alloc, &mut image_xobjects));
    let signature = assets
        .signature
        .as_deref()
        .and_then(|d| embed_image(&mut pdf, d, "signature", &mut alloc, &mut image_xobjects));

    let mut cover_content = Content::new();
    draw_cover(&mut cover_content, record, cover.as_ref(), &fonts);

    let mut flow = PageFlow::new(&fonts, logo.as_ref());
    flow.start_page();
    for block in blocks {
        draw_block(&mut flow, &fonts, block, signature.as_ref());
    }
    let content_pages = flow.finish();
    if content_pages.is_empty() {
        return Err(Error::Render("no content pages produced".into()));
    }

    let mut all_contents = vec![cover_content];
    all_contents.extend(content_pages);
    let n = all_contents.len();

    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, c) in all_contents.into_iter().enumerate() {
        let raw = c.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut font_dict = resources.fonts();
            for (name, font_ref) in fonts.resource_pairs() {
                font_dict.pair(Name(name.as_bytes()), font_ref);
            }
        }
        if !image_xobjects.is_empty() {
            let mut xobjects = resources.x_objects();
            for (name, xobj_ref) in &image_xobjects {
                xobjects.pair(Name(name.as_bytes()), *xobj_ref);
            }
        }
    }

    Ok((pdf.finish(), n))
}
