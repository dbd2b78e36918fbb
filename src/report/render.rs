use chrono::{DateTime, Datelike, Local, Timelike};
use pdf_writer::{Content, Date, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use super::assets::PreparedImage;
use super::layout::{DrawOp, Frame, Page, PageGeometry, PlacedText};
use super::text::{encode_win_ansi, text_width, Face};

const FOOTER_SIZE: f32 = 9.0;
const GRID_LINE: f32 = 0.75;
/// #f0f0f0
const HEADER_SHADE: f32 = 0.94;

/// Metadata written to the document info dictionary.
#[derive(Debug, Clone)]
pub struct DocumentInfo {
    pub title: String,
    pub created: DateTime<Local>,
}

fn pdf_date(dt: &DateTime<Local>) -> Date {
    Date::new(dt.year().clamp(0, 9999) as u16)
        .month(dt.month() as u8)
        .day(dt.day() as u8)
        .hour(dt.hour() as u8)
        .minute(dt.minute() as u8)
        .second(dt.second() as u8)
}

fn image_name(index: usize) -> String {
    format!("Im{index}")
}

/// Serialize laid-out pages to PDF bytes.
pub fn render_pdf(
    pages: &[Page],
    images: &[PreparedImage],
    geo: &PageGeometry,
    info: &DocumentInfo,
) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut alloc = Ref::new(1);

    let catalog_id = alloc.bump();
    let page_tree_id = alloc.bump();
    let info_id = alloc.bump();
    let regular_id = alloc.bump();
    let bold_id = alloc.bump();

    pdf.catalog(catalog_id).pages(page_tree_id);
    for (face, id) in [(Face::Regular, regular_id), (Face::Bold, bold_id)] {
        pdf.type1_font(id)
            .base_font(Name(face.base_font()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let mut image_ids = Vec::with_capacity(images.len());
    for img in images {
        let id = alloc.bump();
        let mut xobject = pdf.image_xobject(id, &img.jpeg);
        xobject.filter(Filter::DctDecode);
        xobject.width(img.width_px as i32);
        xobject.height(img.height_px as i32);
        xobject.color_space().device_rgb();
        xobject.bits_per_component(8);
        xobject.finish();
        image_ids.push(id);
    }
    let image_names: Vec<String> = (0..images.len()).map(image_name).collect();

    let total = pages.len();
    let mut page_ids = Vec::with_capacity(total);
    for page in pages {
        let page_id = alloc.bump();
        let content_id = alloc.bump();
        page_ids.push(page_id);

        let content = page_content(page, total, geo, &image_names);
        pdf.stream(content_id, &content);

        let mut pdf_page = pdf.page(page_id);
        pdf_page.media_box(Rect::new(0.0, 0.0, geo.width, geo.height));
        pdf_page.parent(page_tree_id);
        pdf_page.contents(content_id);

        let mut resources = pdf_page.resources();
        let mut fonts = resources.fonts();
        fonts.pair(Name(Face::Regular.resource_name()), regular_id);
        fonts.pair(Name(Face::Bold.resource_name()), bold_id);
        fonts.finish();

        let mut used: Vec<usize> = page.images().map(|(i, _)| i).collect();
        used.sort_unstable();
        used.dedup();
        if !used.is_empty() {
            let mut xobjects = resources.x_objects();
            for i in used {
                xobjects.pair(Name(image_names[i].as_bytes()), image_ids[i]);
            }
            xobjects.finish();
        }
        resources.finish();
        pdf_page.finish();
    }

    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(total as i32);

    pdf.document_info(info_id)
        .title(TextStr(&info.title))
        .producer(TextStr("event-report"))
        .creation_date(pdf_date(&info.created));

    pdf.finish()
}

fn page_content(page: &Page, total: usize, geo: &PageGeometry, image_names: &[String]) -> Vec<u8> {
    let mut content = Content::new();
    let flip = |y: f32| geo.height - y;

    for op in &page.ops {
        match op {
            DrawOp::Text(t) => draw_text(&mut content, t, geo),
            DrawOp::Row(row) => {
                if row.header {
                    content.save_state();
                    content.set_fill_gray(HEADER_SHADE);
                    for cell in &row.cells {
                        rect(&mut content, cell, geo);
                    }
                    content.fill_nonzero();
                    content.restore_state();
                }
                content.save_state();
                content.set_line_width(GRID_LINE);
                content.set_stroke_gray(0.0);
                for cell in &row.cells {
                    rect(&mut content, cell, geo);
                }
                content.stroke();
                content.restore_state();
                for t in &row.texts {
                    draw_text(&mut content, t, geo);
                }
            }
            DrawOp::Image { index, frame } => {
                content.save_state();
                content.transform([
                    frame.width,
                    0.0,
                    0.0,
                    frame.height,
                    frame.x,
                    flip(frame.y + frame.height),
                ]);
                content.x_object(Name(image_names[*index].as_bytes()));
                content.restore_state();
            }
        }
    }

    let footer = format!("Page {} of {}", page.number, total);
    let width = text_width(&footer, Face::Regular, FOOTER_SIZE);
    draw_text(
        &mut content,
        &PlacedText {
            x: (geo.width - width) / 2.0,
            baseline: geo.height - geo.margin / 2.0,
            text: footer,
            face: Face::Regular,
            size: FOOTER_SIZE,
        },
        geo,
    );

    content.finish()
}

fn rect(content: &mut Content, frame: &Frame, geo: &PageGeometry) {
    content.rect(
        frame.x,
        geo.height - frame.y - frame.height,
        frame.width,
        frame.height,
    );
}

fn draw_text(content: &mut Content, t: &PlacedText, geo: &PageGeometry) {
    let bytes = encode_win_ansi(&t.text);
    content.begin_text();
    content.set_font(Name(t.face.resource_name()), t.size);
    content.next_line(t.x, geo.height - t.baseline);
    content.show(Str(&bytes));
    content.end_text();
}
