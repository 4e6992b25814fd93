//! # Path Player
//!
//! Walks a playback cursor over the recorded path.
//!
//! ## Timing
//!
//! Playback runs against a fixed base rate (60 path frames per second at
//! speed 1.0), not against the host sample rate. On every call:
//!
//! ```text
//! target_frame = floor(frame * sample_time * base_rate * speed)
//! ```
//!
//! The cursor steps once whenever `target_frame` moves past the last frame
//! it stepped on. It steps exactly once per call no matter how far ahead
//! `target_frame` has jumped, so a long stall never skips path points.
//!
//! A change of speed multiplier resynchronizes instead of stepping: the
//! last frame is zeroed and the cursor stays put for that call.
//!
//! ## Direction
//!
//! ```text
//! Forward    0 1 2 0 1 2 ...
//! PingPong   0 1 2 1 0 1 2 ...
//! Reverse    0 2 1 0 2 1 ...
//! ```
//!
//! Reverse moves the index to `len` before decrementing from 0, so the
//! sentinel never reaches the output. PingPong caps its index at `len`
//! rather than `len - 1`; that value is only reachable from a cursor left
//! over from a longer path, and the path's `sample_at` reads it as the
//! last point.

use nih_plug::prelude::Enum;

use super::path::RecordedPath;

/// Traversal mode, the three-position direction switch.
#[derive(Enum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathDirection {
    #[id = "fwd"]
    #[name = "Fwd"]
    Forward,
    #[id = "inout"]
    #[name = "InOut"]
    PingPong,
    #[id = "rev"]
    #[name = "Rev"]
    Reverse,
}

impl PathDirection {
    /// Convert a raw switch position (0, 1, 2). Values are rounded to the
    /// nearest position and clamped into the switch's range.
    pub fn from_switch(raw: f32) -> Self {
        let position = if raw.is_nan() { 0.0 } else { raw.round() };
        if position >= 2.0 {
            PathDirection::Reverse
        } else if position >= 1.0 {
            PathDirection::PingPong
        } else {
            PathDirection::Forward
        }
    }
}

/// Where playback is and where it is heading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackCursor {
    /// Index into the path. May equal (or, after a shorter re-recording,
    /// exceed) the path length.
    pub index: usize,
    /// Current traversal direction; PingPong flips this at either end.
    pub forward: bool,
    /// Last path frame the cursor stepped on.
    pub last_frame: i64,
    /// Last speed multiplier seen. Starts at 0.0, below the speed range,
    /// so the first playback call always resynchronizes.
    pub last_speed: f32,
}

impl Default for PlaybackCursor {
    fn default() -> Self {
        Self {
            index: 0,
            forward: true,
            last_frame: 0,
            last_speed: 0.0,
        }
    }
}

/// What a playback call did to the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Speed changed; timing was reset and the cursor held.
    Resynced,
    /// Not yet time for the next path frame.
    Held,
    /// The cursor moved one step.
    Stepped,
}

/// The playback state machine.
#[derive(Debug, Clone)]
pub struct PathPlayer {
    cursor: PlaybackCursor,
    base_rate: f64,
}

impl PathPlayer {
    pub fn new(base_rate: f64) -> Self {
        Self {
            cursor: PlaybackCursor::default(),
            base_rate,
        }
    }

    pub fn cursor(&self) -> &PlaybackCursor {
        &self.cursor
    }

    /// Start from an explicit cursor state.
    pub fn set_cursor(&mut self, cursor: PlaybackCursor) {
        self.cursor = cursor;
    }

    /// The path frame number for the given moment of processing time.
    pub fn target_frame(&self, frame: u64, sample_time: f32, speed: f32) -> i64 {
        let elapsed = frame as f64 * f64::from(sample_time);
        (elapsed * self.base_rate * f64::from(speed)).floor() as i64
    }

    /// Run one playback call against `path_len` points.
    ///
    /// `path_len` must be non-zero; the caller falls back to direct output
    /// for an empty path.
    pub fn advance(
        &mut self,
        path_len: usize,
        frame: u64,
        sample_time: f32,
        speed: f32,
        direction: PathDirection,
    ) -> Advance {
        nih_plug::nih_debug_assert!(path_len > 0, "playback over an empty path");

        let target_frame = self.target_frame(frame, sample_time, speed);

        if speed != self.cursor.last_speed {
            self.cursor.last_speed = speed;
            self.cursor.last_frame = 0;
            return Advance::Resynced;
        }

        if target_frame <= self.cursor.last_frame {
            return Advance::Held;
        }

        self.cursor.last_frame = target_frame;
        self.step(path_len, direction);
        Advance::Stepped
    }

    /// Move the cursor exactly one step in `direction`.
    pub fn step(&mut self, path_len: usize, direction: PathDirection) {
        if path_len == 0 {
            return;
        }
        let cursor = &mut self.cursor;

        match direction {
            PathDirection::Forward => {
                cursor.forward = true;
                cursor.index += 1;
                if cursor.index >= path_len {
                    cursor.index = 0;
                }
            }
            PathDirection::PingPong => {
                if cursor.index == 0 {
                    cursor.forward = true;
                } else if cursor.index == path_len - 1 {
                    cursor.forward = false;
                }

                cursor.index = if cursor.forward {
                    cursor.index + 1
                } else {
                    cursor.index.saturating_sub(1)
                };

                cursor.index = cursor.index.min(path_len);
            }
            PathDirection::Reverse => {
                cursor.forward = false;
                if cursor.index == 0 {
                    cursor.index = path_len;
                }
                cursor.index -= 1;
            }
        }
    }

    /// Advance over `path` and return the index to emit, or `None` for an
    /// empty path.
    pub fn play(
        &mut self,
        path: &RecordedPath,
        frame: u64,
        sample_time: f32,
        speed: f32,
        direction: PathDirection,
    ) -> Option<usize> {
        if path.is_empty() {
            return None;
        }
        self.advance(path.len(), frame, sample_time, speed, direction);
        Some(self.cursor.index)
    }
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE_RATE: f64 = 60.0;

    /// One path frame per call: at speed 1.0 and sample time 1/60 s, frame
    /// `n` maps to target frame `n`.
    const SAMPLE_TIME: f32 = 1.0 / 60.0;

    /// Step the cursor `steps` times and collect the index after each step.
    fn walk(player: &mut PathPlayer, len: usize, direction: PathDirection, steps: usize) -> Vec<usize> {
        (0..steps)
            .map(|_| {
                player.step(len, direction);
                player.cursor().index
            })
            .collect()
    }

    /// Forward steps up by one and wraps to 0 when it reaches `len`.
    #[test]
    fn test_forward_wraps_at_len() {
        let mut player = PathPlayer::new(BASE_RATE);

        // From index 0 on a 3-point path:
        //   0 -> 1 -> 2 -> (3 wraps to) 0 -> 1 -> 2 -> 0
        let indices = walk(&mut player, 3, PathDirection::Forward, 6);
        assert_eq!(indices, vec![1, 2, 0, 1, 2, 0]);
        assert!(player.cursor().forward);
    }

    /// 0 -> 1 -> 2 -> (flip) 1 -> 0 -> (flip) 1 -> 2 ...
    #[test]
    fn test_ping_pong_flips_at_both_ends() {
        let mut player = PathPlayer::new(BASE_RATE);
        let mut trace = Vec::new();
        for _ in 0..8 {
            player.step(3, PathDirection::PingPong);
            trace.push((player.cursor().index, player.cursor().forward));
        }

        assert_eq!(
            trace,
            vec![
                (1, true),
                (2, true),
                (1, false), // flipped at len - 1
                (0, false),
                (1, true), // flipped at 0
                (2, true),
                (1, false),
                (0, false),
            ]
        );
    }

    /// The sentinel `len` is set and consumed within one step, so the
    /// emitted sequence from 0 is 2, 1, 0, 2, ...
    #[test]
    fn test_reverse_uses_len_sentinel_before_decrement() {
        let mut player = PathPlayer::new(BASE_RATE);

        // At 0 the index jumps to 3 and is decremented in the same step:
        //   0 -> (3 - 1) 2 -> 1 -> 0 -> (3 - 1) 2 -> 1 -> 0
        let indices = walk(&mut player, 3, PathDirection::Reverse, 6);
        assert_eq!(indices, vec![2, 1, 0, 2, 1, 0]);
        assert!(!player.cursor().forward);
    }

    /// A stale cursor from a longer path, heading forward, climbs to `len`
    /// and stays there: the PingPong cap is `len`, not `len - 1`.
    #[test]
    fn test_ping_pong_caps_at_len() {
        let mut player = PathPlayer::new(BASE_RATE);
        player.set_cursor(PlaybackCursor {
            index: 5,
            forward: true,
            ..PlaybackCursor::default()
        });

        // Index 5 is neither 0 nor len - 1 (2), so no flip:
        //   5 + 1 = 6, capped to 3. From 3 again: 4, capped to 3.
        let indices = walk(&mut player, 3, PathDirection::PingPong, 3);
        assert_eq!(indices, vec![3, 3, 3]);
    }

    /// Heading backward from past the end, PingPong walks back into range
    /// and then bounces normally.
    #[test]
    fn test_ping_pong_backward_from_past_end() {
        let mut player = PathPlayer::new(BASE_RATE);
        player.set_cursor(PlaybackCursor {
            index: 3,
            forward: false,
            ..PlaybackCursor::default()
        });

        // 3 -> 2 (no flip yet, 3 is not len - 1), then the flip at 2 keeps
        // it heading down: 1 -> 0, and the flip at 0 turns it around.
        let indices = walk(&mut player, 3, PathDirection::PingPong, 5);
        assert_eq!(indices, vec![2, 1, 0, 1, 2]);
    }

    /// Single-point paths: Forward and Reverse stay on 0, PingPong climbs
    /// to the cap at 1.
    #[test]
    fn test_single_point_path() {
        let mut player = PathPlayer::new(BASE_RATE);

        // Forward: 0 + 1 = 1 >= len wraps to 0.
        // Reverse: 0 jumps to len (1) and decrements back to 0.
        // PingPong: index 0 is both ends; heading forward, 0 + 1 = 1 is
        // within the cap and stays there.
        assert_eq!(walk(&mut player, 1, PathDirection::Forward, 3), vec![0, 0, 0]);
        assert_eq!(walk(&mut player, 1, PathDirection::Reverse, 3), vec![0, 0, 0]);
        assert_eq!(walk(&mut player, 1, PathDirection::PingPong, 3), vec![1, 1, 1]);
    }

    #[test]
    fn test_reverse_from_past_end_never_underflows() {
        let mut player = PathPlayer::new(BASE_RATE);
        player.set_cursor(PlaybackCursor {
            index: 5,
            ..PlaybackCursor::default()
        });

        // Plain decrements until 0, then the usual jump to len - 1.
        let indices = walk(&mut player, 3, PathDirection::Reverse, 7);
        assert_eq!(indices, vec![4, 3, 2, 1, 0, 2, 1]);
    }

    /// The very first call sees a speed change (0.0 -> 1.0) and holds.
    #[test]
    fn test_first_call_resyncs() {
        let mut player = PathPlayer::new(BASE_RATE);

        // Frame 10 is target frame 10, well past 0, but the speed change
        // takes precedence.
        let result = player.advance(3, 10, SAMPLE_TIME, 1.0, PathDirection::Forward);

        assert_eq!(result, Advance::Resynced);
        assert_eq!(player.cursor().index, 0);
        assert_eq!(player.cursor().last_frame, 0);
        assert_eq!(player.cursor().last_speed, 1.0);
    }

    #[test]
    fn test_speed_change_resets_frame_without_moving() {
        let mut player = PathPlayer::new(BASE_RATE);
        player.advance(3, 1, SAMPLE_TIME, 1.0, PathDirection::Forward);
        assert_eq!(
            player.advance(3, 2, SAMPLE_TIME, 1.0, PathDirection::Forward),
            Advance::Stepped
        );
        let index_before = player.cursor().index;
        assert_eq!(player.cursor().last_frame, 2);

        // Doubling the speed would put target frame 3 at 6; instead the
        // call resyncs and the cursor holds.
        let result = player.advance(3, 3, SAMPLE_TIME, 2.0, PathDirection::Forward);

        assert_eq!(result, Advance::Resynced);
        assert_eq!(player.cursor().index, index_before);
        assert_eq!(player.cursor().last_frame, 0);
    }

    /// After a resync the next call steps immediately, since target frames
    /// are absolute and the counter was zeroed.
    #[test]
    fn test_step_after_resync() {
        let mut player = PathPlayer::new(BASE_RATE);
        // Resync: last_frame = 0.
        player.advance(3, 100, SAMPLE_TIME, 1.0, PathDirection::Forward);

        // Same frame again: target 100 > 0, so one step.
        let result = player.advance(3, 100, SAMPLE_TIME, 1.0, PathDirection::Forward);
        assert_eq!(result, Advance::Stepped);
        assert_eq!(player.cursor().index, 1);
        assert_eq!(player.cursor().last_frame, 100);
    }

    /// At 48 kHz and speed 1.0 a path frame lasts 800 samples.
    #[test]
    fn test_holds_until_next_path_frame() {
        let sample_time = 1.0 / 48_000.0;
        let mut player = PathPlayer::new(BASE_RATE);
        player.advance(3, 0, sample_time, 1.0, PathDirection::Forward);

        let mut steps = 0;
        for frame in 1..=2400_u64 {
            if player.advance(3, frame, sample_time, 1.0, PathDirection::Forward) == Advance::Stepped {
                steps += 1;
            }
        }

        // Frames 800, 1600 and 2400, allowing for rounding at the edges.
        assert!((2..=3).contains(&steps), "Expected 2-3 steps, got {steps}");
        assert_eq!(player.cursor().index, steps % 3);
    }

    /// A large jump in time still moves the cursor by one point.
    #[test]
    fn test_time_jump_steps_once() {
        let mut player = PathPlayer::new(BASE_RATE);
        player.advance(10, 0, SAMPLE_TIME, 1.0, PathDirection::Forward);

        // A million frames later: one step, not a million.
        assert_eq!(
            player.advance(10, 1_000_000, SAMPLE_TIME, 1.0, PathDirection::Forward),
            Advance::Stepped
        );
        assert_eq!(player.cursor().index, 1);
        // last_frame caught up with the target, so repeating the frame holds.
        assert_eq!(
            player.advance(10, 1_000_000, SAMPLE_TIME, 1.0, PathDirection::Forward),
            Advance::Held
        );
    }

    #[test]
    fn test_target_frame_scales_with_speed() {
        let player = PathPlayer::new(BASE_RATE);
        // 1/64 s is exact in f32, so 64 frames is exactly one second.
        let sample_time = 1.0 / 64.0;
        // 1 s * 60 * 1.0 = 60
        assert_eq!(player.target_frame(64, sample_time, 1.0), 60);
        // 1 s * 60 * 2.5 = 150
        assert_eq!(player.target_frame(64, sample_time, 2.5), 150);
        // 0.5 s * 60 * 0.1 = 3.0000000447 (0.1 is not exact in f32), floored to 3
        assert_eq!(player.target_frame(32, sample_time, 0.1), 3);
    }

    /// Forward playback driven through timing: 0 -> 1 -> 2 -> 0 -> 1 -> 2.
    #[test]
    fn test_play_forward_sequence() {
        let path: RecordedPath = [(0.0, 0.0), (0.5, 0.5), (1.0, 1.0)].into_iter().collect();
        let mut player = PathPlayer::new(BASE_RATE);
        // Frame 0 resyncs and emits the starting index; every later frame
        // is a new path frame and steps once.
        let mut emitted = vec![player.play(&path, 0, SAMPLE_TIME, 1.0, PathDirection::Forward)];
        for frame in 1..=6 {
            emitted.push(player.play(&path, frame, SAMPLE_TIME, 1.0, PathDirection::Forward));
        }

        let expected: Vec<Option<usize>> = [0, 1, 2, 0, 1, 2, 0].into_iter().map(Some).collect();
        assert_eq!(emitted, expected);
    }

    #[test]
    fn test_play_empty_path() {
        let mut player = PathPlayer::new(BASE_RATE);
        assert_eq!(
            player.play(&RecordedPath::new(), 5, SAMPLE_TIME, 1.0, PathDirection::Forward),
            None
        );
        assert_eq!(player.cursor(), &PlaybackCursor::default());
    }

    #[test]
    fn test_direction_from_switch() {
        assert_eq!(PathDirection::from_switch(0.0), PathDirection::Forward);
        assert_eq!(PathDirection::from_switch(1.0), PathDirection::PingPong);
        assert_eq!(PathDirection::from_switch(2.0), PathDirection::Reverse);
        assert_eq!(PathDirection::from_switch(1.4), PathDirection::PingPong);
        assert_eq!(PathDirection::from_switch(7.0), PathDirection::Reverse);
        assert_eq!(PathDirection::from_switch(-1.0), PathDirection::Forward);
        assert_eq!(PathDirection::from_switch(f32::NAN), PathDirection::Forward);
    }
}
