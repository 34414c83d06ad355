//! Sprite drawing, a thin pass over Position+Drawable.

use sdl2::pixels::Color;
use sdl2::render::{Canvas, Texture};
use sdl2::video::Window;

use crate::constants::FRAME_PERIOD;
use crate::ecs::{Components, Drawable, Entity, Position, Store};
use crate::error::{GameError, GameResult};
use crate::texture::centered_rect;

/// Draws every Position+Drawable entity in ascending id order (the backdrop
/// is created first, so id order doubles as layering) and advances each
/// frame counter.
pub fn render_system(store: &mut Store, canvas: &mut Canvas<Window>, atlas: &Texture) -> GameResult<()> {
    canvas.set_draw_color(Color::RGB(0, 0, 0));
    canvas.clear();

    let entities: Vec<Entity> = store.entities().collect();
    for entity in entities {
        if !store.has(entity, Components::POSITION | Components::DRAWABLE)? {
            continue;
        }
        let position = *store.get::<Position>(entity)?;
        let (source, size) = {
            let drawable = store.get_mut::<Drawable>(entity)?;
            drawable.frame = drawable.frame.wrapping_add(1);
            let which = ((drawable.frame / FRAME_PERIOD) & 1) as usize;
            (drawable.frames[which], drawable.size)
        };

        canvas
            .copy_ex(
                atlas,
                Some(source.rect()),
                Some(centered_rect(position.point, size)),
                position.angle as f64,
                None,
                false,
                false,
            )
            .map_err(GameError::Sdl)?;
    }

    canvas.present();
    Ok(())
}
