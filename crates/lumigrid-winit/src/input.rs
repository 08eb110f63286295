//! Translates winit input events into [`Input`] values for a [`Scene`](crate::Scene).

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::{Key as WKey, NamedKey};

use lumigrid_core::Stage;

/// Input delivered to a scene. Pointer coordinates are in logical stage
/// space (Y up, origin at the center).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Input {
    Key(char),
    Escape,
    PointerMoved { x: f64, y: f64 },
    PointerPressed { x: f64, y: f64 },
    PointerReleased { x: f64, y: f64 },
}

// ---------------------------------------------------------------------------
// Keyboard
// ---------------------------------------------------------------------------

pub(crate) fn translate_keyboard(event: &KeyEvent) -> Option<Input> {
    if event.state != ElementState::Pressed {
        return None;
    }

    match &event.logical_key {
        WKey::Named(NamedKey::Escape) => Some(Input::Escape),
        WKey::Named(NamedKey::Space) => Some(Input::Key(' ')),
        WKey::Character(s) => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Input::Key(c)),
                _ => None,
            }
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Pointer
// ---------------------------------------------------------------------------

/// Logical stage coordinates of a window pixel. `None` while the window has
/// no area.
pub(crate) fn pixel_to_logical(
    position: PhysicalPosition<f64>,
    width: u32,
    height: u32,
) -> Option<(f64, f64)> {
    if width == 0 || height == 0 {
        return None;
    }
    Some(Stage::to_logical(
        position.x,
        position.y,
        width as f64,
        height as f64,
    ))
}

pub(crate) fn translate_mouse_button(
    btn_state: ElementState,
    button: MouseButton,
    cursor: Option<(f64, f64)>,
) -> Option<Input> {
    if button != MouseButton::Left {
        return None;
    }
    let (x, y) = cursor?;
    Some(match btn_state {
        ElementState::Pressed => Input::PointerPressed { x, y },
        ElementState::Released => Input::PointerReleased { x, y },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_center_is_stage_origin() {
        let p = pixel_to_logical(PhysicalPosition::new(400.0, 300.0), 800, 600);
        assert_eq!(p, Some((0.0, 0.0)));
    }

    #[test]
    fn top_left_is_stage_corner() {
        let p = pixel_to_logical(PhysicalPosition::new(0.0, 0.0), 960, 720);
        assert_eq!(p, Some((-240.0, 180.0)));
    }

    #[test]
    fn zero_sized_window_has_no_position() {
        assert_eq!(pixel_to_logical(PhysicalPosition::new(1.0, 1.0), 0, 10), None);
    }

    #[test]
    fn only_left_button_with_known_cursor() {
        let pressed =
            translate_mouse_button(ElementState::Pressed, MouseButton::Left, Some((1.0, 2.0)));
        assert_eq!(pressed, Some(Input::PointerPressed { x: 1.0, y: 2.0 }));
        assert_eq!(
            translate_mouse_button(ElementState::Pressed, MouseButton::Right, Some((1.0, 2.0))),
            None
        );
        assert_eq!(
            translate_mouse_button(ElementState::Released, MouseButton::Left, None),
            None
        );
    }
}
