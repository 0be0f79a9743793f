use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::{error::ApiError, models::TodoWithUsers};

/// render_todo_pdf
///
/// Renders a single todo record as a one-page A4 PDF: a "Todo Details"
/// heading followed by one line per field. Uses builtin Helvetica so no font
/// files ship with the binary. Returns the finished document bytes, ready to
/// stream as a download or attach to an email.
pub fn render_todo_pdf(todo: &TodoWithUsers) -> Result<Vec<u8>, ApiError> {
    let (doc, page, layer) = PdfDocument::new("Todo Details", Mm(210.0), Mm(297.0), "Layer 1");
    let layer = doc.get_page(page).get_layer(layer);

    let heading_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| ApiError::Pdf(e.to_string()))?;
    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ApiError::Pdf(e.to_string()))?;

    layer.use_text("Todo Details", 20.0, Mm(20.0), Mm(270.0), &heading_font);

    let created_by = todo.created_by_name.as_deref().unwrap_or("unknown");
    let updated_by = todo.updated_by_name.as_deref().unwrap_or("-");

    let lines = [
        format!("Description: {}", todo.description),
        format!("Amount: {}", todo.amount),
        format!("Created At: {}", todo.created_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Updated At: {}", todo.updated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Created By: {created_by}"),
        format!("Updated By: {updated_by}"),
    ];

    let mut y = 250.0;
    for line in &lines {
        layer.use_text(line.as_str(), 14.0, Mm(20.0), Mm(y), &body_font);
        y -= 10.0;
    }

    doc.save_to_bytes().map_err(|e| ApiError::Pdf(e.to_string()))
}

/// The attachment/download filename for a todo's PDF rendering.
pub fn todo_pdf_filename(todo_id: i32) -> String {
    format!("todo_{todo_id}.pdf")
}
