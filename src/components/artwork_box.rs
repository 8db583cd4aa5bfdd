use ratatui::{
    layout::Alignment,
    prelude::{Frame, Rect},
    style::{Color, Style},
    widgets::Paragraph,
};

use crate::artwork::ArtworkView;

const TEXT_DIM: Color = Color::Rgb(176, 195, 207);

/// Draws artwork centred in `area`, or a dim one-line placeholder
pub fn render_artwork(
    frame: &mut Frame,
    area: Rect,
    view: ArtworkView<'_>,
    loading: &str,
    missing: &str,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let placeholder = match view {
        ArtworkView::Ready(artwork) => {
            let (cols, rows) = artwork.fit(area.width, area.height);
            let target = Rect {
                x: area.x + (area.width - cols) / 2,
                y: area.y + (area.height - rows) / 2,
                width: cols,
                height: rows,
            };
            frame.render_widget(Paragraph::new(artwork.lines(cols, rows)), target);
            return;
        }
        ArtworkView::Loading => loading,
        ArtworkView::NoImage | ArtworkView::Missing => missing,
    };

    let line_area = Rect {
        y: area.y + area.height / 2,
        height: 1,
        ..area
    };
    frame.render_widget(
        Paragraph::new(placeholder.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(TEXT_DIM)),
        line_area,
    );
}
