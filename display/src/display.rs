use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::WindowCanvas;

use vm8_core::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use vm8_core::state::FrameBuffer;

/// Window pixels per framebuffer pixel.
const SCALE: u32 = 10;

/// # Display
/// Renders the 64x32 monochrome framebuffer into an SDL2 window, one filled
/// square per lit pixel. `render` is only called when the core has requested
/// a redraw, so the window keeps its last frame between updates.
pub struct Display {
    canvas: WindowCanvas,
}

impl Display {
    /// Opens a window on the given SDL context, sized to the framebuffer at
    /// [`SCALE`]. SDL reports failures as strings; they bubble up to the
    /// driver.
    pub fn new(sdl: &sdl2::Sdl) -> Result<Self, String> {
        let video = sdl.video()?;
        let window = video
            .window(
                "vm8",
                DISPLAY_WIDTH as u32 * SCALE,
                DISPLAY_HEIGHT as u32 * SCALE,
            )
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;
        let canvas = window
            .into_canvas()
            .build()
            .map_err(|e| e.to_string())?;
        Ok(Display { canvas })
    }

    /// Draws a frame: black background, one white rect per lit pixel.
    pub fn render(&mut self, frame: &FrameBuffer) -> Result<(), String> {
        self.canvas.set_draw_color(Color::RGB(0, 0, 0));
        self.canvas.clear();

        self.canvas.set_draw_color(Color::RGB(255, 255, 255));
        for (y, row) in frame.iter().enumerate() {
            for (x, &pixel) in row.iter().enumerate() {
                if pixel != 0 {
                    self.canvas.fill_rect(Rect::new(
                        x as i32 * SCALE as i32,
                        y as i32 * SCALE as i32,
                        SCALE,
                        SCALE,
                    ))?;
                }
            }
        }

        self.canvas.present();
        Ok(())
    }
}
