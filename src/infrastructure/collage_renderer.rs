// Collage renderer - lays tiles into a grid and overlays captions
use crate::domain::tile::{EntityKind, Tile};
use crate::infrastructure::glyphs::{ClipRect, GlyphPainter, TextStyle};
use image::{Rgba, RgbaImage, imageops};

pub const TILE_SIZE: u32 = 300;

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);
const FOREGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const STROKE_COLOR: Rgba<u8> = Rgba([0, 0, 0, 255]);

const CAPTION_EM_PX: f32 = 18.0;
const CAPTION_LINE_GAP: i32 = 4;
const CAPTION_PADDING: i32 = 2;
const CAPTION_LEFT_MARGIN: i32 = 10;
const STROKE_RADIUS: i32 = 2;

pub const ERROR_IMAGE_WIDTH: u32 = 640;
pub const ERROR_IMAGE_HEIGHT: u32 = 65;
const ERROR_EM_PX: f32 = 30.0;
const ERROR_MARGIN: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollageLayout {
    pub kind: EntityKind,
    pub rows: usize,
    pub cols: usize,
    pub show_info: bool,
    pub show_play_count: bool,
}

pub fn canvas_dimensions(rows: usize, cols: usize) -> (u32, u32) {
    (TILE_SIZE * cols as u32, TILE_SIZE * rows as u32)
}

/// Top-left pixel of the cell holding tile `index`, filled row-major
pub fn cell_origin(index: usize, cols: usize) -> (u32, u32) {
    let col = (index % cols) as u32;
    let row = (index / cols) as u32;
    (col * TILE_SIZE, row * TILE_SIZE)
}

/// Paint every tile's artwork into its cell; imageless cells stay background.
pub fn compose_grid(tiles: &[Tile], rows: usize, cols: usize) -> RgbaImage {
    let (width, height) = canvas_dimensions(rows, cols);
    let mut canvas = RgbaImage::from_pixel(width, height, BACKGROUND);

    for (index, tile) in tiles.iter().enumerate().take(rows * cols) {
        let Some(artwork) = tile.image() else {
            continue;
        };
        let (x, y) = cell_origin(index, cols);
        // Artwork is expected at cell size; anything larger is cropped
        let view = imageops::crop_imm(
            artwork,
            0,
            0,
            artwork.width().min(TILE_SIZE),
            artwork.height().min(TILE_SIZE),
        );
        imageops::replace(&mut canvas, &*view, i64::from(x), i64::from(y));
    }

    canvas
}

/// Caption lines for one tile, top to bottom
pub fn caption_lines(tile: &Tile, layout: &CollageLayout) -> Vec<String> {
    let mut lines = Vec::with_capacity(3);
    if layout.show_info {
        if layout.kind != EntityKind::Artist {
            if let Some(primary) = tile.primary_label() {
                lines.push(primary.to_string());
            }
        }
        lines.push(tile.secondary_label().to_string());
    }
    if layout.show_play_count {
        lines.push(format!("{} plays", tile.play_count()));
    }
    lines
}

/// Offsets of the outline pass: the square of radius `STROKE_RADIUS`
/// without its center row and column
fn stroke_offsets() -> impl Iterator<Item = (i32, i32)> {
    (-STROKE_RADIUS..=STROKE_RADIUS).flat_map(|dx| {
        (-STROKE_RADIUS..=STROKE_RADIUS)
            .filter(move |dy| dx != 0 && *dy != 0)
            .map(move |dy| (dx, dy))
    })
}

#[derive(Clone)]
pub struct CollageRenderer {
    painter: GlyphPainter,
}

impl CollageRenderer {
    pub fn new(painter: GlyphPainter) -> Self {
        Self { painter }
    }

    pub fn render_collage(&self, tiles: &[Tile], layout: &CollageLayout) -> RgbaImage {
        let mut canvas = compose_grid(tiles, layout.rows, layout.cols);

        if layout.show_info || layout.show_play_count {
            for (index, tile) in tiles.iter().enumerate().take(layout.rows * layout.cols) {
                let (x, y) = cell_origin(index, layout.cols);
                let lines = caption_lines(tile, layout);
                self.draw_caption(&mut canvas, &lines, x, y);
            }
        }

        canvas
    }

    /// Fixed-size image carrying a single message
    pub fn render_error(&self, message: &str) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(ERROR_IMAGE_WIDTH, ERROR_IMAGE_HEIGHT, BACKGROUND);
        let clip = ClipRect::of_image(&canvas);
        let style = TextStyle {
            em_px: ERROR_EM_PX,
            color: FOREGROUND,
        };
        let baseline = ERROR_MARGIN + ERROR_EM_PX as i32;
        self.painter
            .draw_text(&mut canvas, message, ERROR_MARGIN, baseline, style, clip);
        canvas
    }

    fn draw_caption(&self, canvas: &mut RgbaImage, lines: &[String], cell_x: u32, cell_y: u32) {
        let clip = ClipRect::new(cell_x, cell_y, TILE_SIZE, TILE_SIZE);
        let x = cell_x as i32 + CAPTION_PADDING + CAPTION_LEFT_MARGIN;
        let top = cell_y as i32 + CAPTION_PADDING;
        let line_height = CAPTION_EM_PX as i32 + CAPTION_LINE_GAP;
        let stroke = TextStyle {
            em_px: CAPTION_EM_PX,
            color: STROKE_COLOR,
        };
        let fill = TextStyle {
            em_px: CAPTION_EM_PX,
            color: FOREGROUND,
        };

        for (i, line) in lines.iter().enumerate() {
            let baseline = top + line_height * (i as i32 + 1);
            for (dx, dy) in stroke_offsets() {
                self.painter
                    .draw_text(canvas, line, x + dx, baseline + dy, stroke, clip);
            }
            self.painter.draw_text(canvas, line, x, baseline, fill, clip);
        }
    }
}
