use crate::{
    engine::prelude::*,
    game::{
        driver::{FrameInput, FrameOutput, PlaybackDriver},
        sprite_renderer::SpriteRenderer,
    },
};

/// Plays the pet's playlist in the window and moves the window around with it.
pub struct PetScene {
    driver: PlaybackDriver,
    sprites: SpriteRenderer,

    /// Result of the most recent update, drawn by the next render.
    last_output: Option<FrameOutput>,
}

impl PetScene {
    pub fn new(driver: PlaybackDriver, sprites: SpriteRenderer) -> Self {
        Self {
            driver,
            sprites,
            last_output: None,
        }
    }
}

impl Scene for PetScene {
    fn update(&mut self, delta_time: f64, input: &InputState, window: &mut dyn WindowMover) {
        let input = FrameInput {
            delta_time,
            pointer: input.pointer_position(),
            primary_button_down: input.primary_button_down(),
            focused: input.is_focused(),
        };

        self.last_output = Some(self.driver.update(&input, window));
    }

    fn render(&mut self, frame: &mut Frame) {
        match self.last_output {
            Some(FrameOutput { clip, source, .. }) => self.sprites.draw_frame(frame, clip, source),
            None => {
                // Nothing updated yet, keep the window see through.
                let _ = frame.begin_basic_render_pass("pet_clear", true);
            }
        }
    }
}
