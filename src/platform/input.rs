//! Keyboard state to tick commands
//!
//! Movement keys are level-triggered (held), action keys are edge-triggered:
//! one press fires once per tick, and auto-repeat while held is ignored.

use glam::Vec2;

use crate::sim::TickInput;

/// Logical keys the game listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameKey {
    Up,
    Down,
    Left,
    Right,
    /// Mount/dismount
    Mount,
    /// Deliver or drop
    Deliver,
}

impl GameKey {
    /// Map a DOM `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(GameKey::Up),
            "ArrowDown" | "s" | "S" => Some(GameKey::Down),
            "ArrowLeft" | "a" | "A" => Some(GameKey::Left),
            "ArrowRight" | "d" | "D" => Some(GameKey::Right),
            "e" | "E" | "Enter" => Some(GameKey::Mount),
            " " | "f" | "F" => Some(GameKey::Deliver),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyboardInput {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    mount_held: bool,
    deliver_held: bool,
    mount_pressed: bool,
    deliver_pressed: bool,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the key belongs to the game (caller may prevent default)
    pub fn key_down(&mut self, key: &str) -> bool {
        let Some(key) = GameKey::from_key(key) else {
            return false;
        };
        match key {
            GameKey::Up => self.up = true,
            GameKey::Down => self.down = true,
            GameKey::Left => self.left = true,
            GameKey::Right => self.right = true,
            GameKey::Mount => {
                if !self.mount_held {
                    self.mount_pressed = true;
                }
                self.mount_held = true;
            }
            GameKey::Deliver => {
                if !self.deliver_held {
                    self.deliver_pressed = true;
                }
                self.deliver_held = true;
            }
        }
        true
    }

    pub fn key_up(&mut self, key: &str) -> bool {
        let Some(key) = GameKey::from_key(key) else {
            return false;
        };
        match key {
            GameKey::Up => self.up = false,
            GameKey::Down => self.down = false,
            GameKey::Left => self.left = false,
            GameKey::Right => self.right = false,
            GameKey::Mount => self.mount_held = false,
            GameKey::Deliver => self.deliver_held = false,
        }
        true
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Screen-space direction from held keys (y grows downward)
    pub fn move_dir(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }

    /// Build this tick's commands and consume pending presses
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            move_dir: self.move_dir(),
            toggle_mount: self.mount_pressed,
            deliver_or_drop: self.deliver_pressed,
        };
        self.mount_pressed = false;
        self.deliver_pressed = false;
        input
    }
}
