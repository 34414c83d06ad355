//! The sprite atlas.
//!
//! There are no image assets: the atlas is a render-target texture painted
//! once at startup with flat-colored regions. `Drawable` components
//! reference regions of it, and the render system copies them out with
//! rotation applied.

use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture, TextureCreator};
use sdl2::video::{Window, WindowContext};

use crate::constants::{
    ATLAS_HEIGHT, ATLAS_WIDTH, BACKGROUND_TEX, GHOST_TEX, PELLET_TEX, PLAYER_TEX, POWER_PELLET_TEX, WALL_TEX,
};
use crate::ecs::SpriteRegion;
use crate::error::{GameError, GameResult};

/// Body colors for the four ghosts.
pub const GHOST_COLORS: [Color; 4] = [
    Color::RGB(255, 0, 0),    // red
    Color::RGB(255, 184, 255), // pink
    Color::RGB(0, 255, 255),  // cyan
    Color::RGB(255, 184, 82), // orange
];

const PLAYER_COLOR: Color = Color::RGB(255, 255, 0);
const PELLET_COLOR: Color = Color::RGB(255, 230, 180);
const WALL_COLOR: Color = Color::RGB(33, 33, 222);
const BACKGROUND_COLOR: Color = Color::RGB(8, 8, 16);

fn dim(color: Color) -> Color {
    Color::RGB(color.r / 2, color.g / 2, color.b / 2)
}

fn fill(canvas: &mut Canvas<Window>, region: &SpriteRegion, color: Color) -> Result<(), String> {
    canvas.set_draw_color(color);
    canvas.fill_rect(region.rect())
}

/// Paints the atlas. The second frame of each actor is a dimmed copy of the
/// first, which reads as chomping (player) or leg-wiggling (ghosts) once the
/// render system alternates them.
pub fn build_atlas(
    canvas: &mut Canvas<Window>,
    texture_creator: &TextureCreator<WindowContext>,
) -> GameResult<Texture> {
    let mut atlas = texture_creator
        .create_texture_target(None, ATLAS_WIDTH, ATLAS_HEIGHT)
        .map_err(|e| GameError::Sdl(e.to_string()))?;

    let mut paint_result = Ok(());
    canvas
        .with_texture_canvas(&mut atlas, |target| {
            paint_result = paint(target);
        })
        .map_err(|e| GameError::Sdl(e.to_string()))?;
    paint_result.map_err(GameError::Sdl)?;

    Ok(atlas)
}

fn paint(canvas: &mut Canvas<Window>) -> Result<(), String> {
    canvas.set_draw_color(Color::RGBA(0, 0, 0, 0));
    canvas.clear();

    fill(canvas, &PLAYER_TEX[0], PLAYER_COLOR)?;
    fill(canvas, &PLAYER_TEX[1], dim(PLAYER_COLOR))?;
    for (frames, color) in GHOST_TEX.iter().zip(GHOST_COLORS) {
        fill(canvas, &frames[0], color)?;
        fill(canvas, &frames[1], dim(color))?;
    }
    fill(canvas, &PELLET_TEX, PELLET_COLOR)?;
    fill(canvas, &POWER_PELLET_TEX, PELLET_COLOR)?;
    fill(canvas, &WALL_TEX, WALL_COLOR)?;
    fill(canvas, &BACKGROUND_TEX, BACKGROUND_COLOR)?;
    Ok(())
}

/// Destination rectangle for a sprite of `size` centered on `center`.
pub fn centered_rect(center: glam::Vec2, size: glam::Vec2) -> Rect {
    Rect::from_center(
        sdl2::rect::Point::new(center.x as i32, center.y as i32),
        size.x as u32,
        size.y as u32,
    )
}
