//! Per-frame simulation tick
//!
//! Core game loop that advances a session by one frame: move and animate
//! every entity, wrap obstacles, resolve collisions and health.

use super::collision::overlapping;
use super::movement::HeldDirections;
use super::respawn::WrapEdge;
use super::state::{GamePhase, GameSession};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Arrow keys held this frame
    pub held: HeldDirections,
    /// Pause toggle
    pub pause: bool,
}

/// Which HUD label the player is touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudSlot {
    Score,
    Health,
}

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    Paused,
    Resumed,
    /// Obstacle left the screen, was repositioned and scored
    ObstacleWrapped { id: u32, edge: WrapEdge },
    /// Obstacle hit the player and was replaced
    ObstacleHit { id: u32, replacement: u32 },
    /// Player overlaps a HUD label (informational only)
    LabelContact(HudSlot),
    GameOver,
}

/// Everything a frontend may want to react to after a tick
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub events: Vec<GameEvent>,
}

impl TickReport {
    pub fn hits(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleHit { .. }))
            .count()
    }

    pub fn wraps(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, GameEvent::ObstacleWrapped { .. }))
            .count()
    }

    pub fn contains(&self, event: &GameEvent) -> bool {
        self.events.contains(event)
    }
}

/// Advance the session by one frame
pub fn tick(session: &mut GameSession, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();

    // Handle pause toggle
    if input.pause {
        match session.phase {
            GamePhase::Playing => {
                session.phase = GamePhase::Paused;
                report.events.push(GameEvent::Paused);
                return report;
            }
            GamePhase::Paused => {
                session.phase = GamePhase::Playing;
                report.events.push(GameEvent::Resumed);
            }
            _ => {}
        }
    }

    match session.phase {
        GamePhase::Story(_) => {
            // Cutscenes only animate the letter bird
            session.time_ticks += 1;
            let viewport = session.viewport;
            if let (Some(bird), rng) = session.split_for_story() {
                bird.update(HeldDirections::NONE, viewport, rng);
            }
            return report;
        }
        GamePhase::Playing => {}
        // Don't tick if paused, over or outside gameplay
        _ => return report,
    }

    session.time_ticks += 1;
    let viewport = session.viewport;

    // 1. Move + animate
    {
        let (player, obstacles, rng) = session.split_for_update();
        player.update(input.held, viewport, rng);

        for obstacle in obstacles {
            if let Some(edge) = obstacle.update(HeldDirections::NONE, viewport, rng) {
                report.events.push(GameEvent::ObstacleWrapped {
                    id: obstacle.id,
                    edge,
                });
            }
        }
    }
    let wrapped = report.wraps() as u32;
    session.score += wrapped;

    // 2. Player vs obstacles: destroy, replace, lose health
    let player_box = session.player.bounds();
    let hits = overlapping(&player_box, session.obstacles.iter().map(|o| (o.id, o.bounds())));
    for id in hits {
        if let Some(replacement) = session.replace_obstacle(id) {
            session.health = session.health.saturating_sub(1);
            log::debug!("Obstacle {id} hit the player, health now {}", session.health);
            report.events.push(GameEvent::ObstacleHit { id, replacement });
        }
    }
    if report.hits() > 0 {
        session.refresh_health_label();
    }

    // 3. Player vs HUD text: detection hook only
    let labels = [
        (HudSlot::Score, session.score_label.bounds()),
        (HudSlot::Health, session.health_label.bounds()),
    ];
    for slot in overlapping(&player_box, labels) {
        report.events.push(GameEvent::LabelContact(slot));
    }

    session.refresh_score_label();

    // 4. Out of health
    if session.health == 0 {
        session.phase = GamePhase::GameOver;
        report.events.push(GameEvent::GameOver);
        log::info!(
            "Game over for {} with score {} ({})",
            session.name,
            session.score,
            session.difficulty.as_str()
        );
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteCatalog;
    use crate::sim::movement::StrategyKind;
    use crate::sim::state::{Difficulty, PlayerName, StoryScene, Viewport};
    use crate::sim::{Entity, FrameHandle, FrameSet};
    use glam::Vec2;
    use proptest::prelude::*;

    fn session(difficulty: Difficulty, seed: u64) -> GameSession {
        let catalog = SpriteCatalog::builtin().unwrap();
        GameSession::new(PlayerName::parse("Tester"), difficulty, Viewport::default(), &catalog, seed).unwrap()
    }

    fn python(id: u32, pos: Vec2, velocity: f32, kind: StrategyKind) -> Entity {
        let frames = FrameSet {
            frames: vec![FrameHandle { sheet: 0, image: 1 }, FrameHandle { sheet: 0, image: 2 }],
            size: Vec2::new(40.0, 40.0),
        };
        Entity::obstacle(id, pos, frames, velocity, kind, 0.02)
    }

    /// Session with the given obstacles and the player parked far away
    fn staged(obstacles: Vec<Entity>) -> GameSession {
        let mut s = session(Difficulty::Easy, 1);
        s.obstacles = obstacles;
        s.player.pos = Vec2::new(500.0, 600.0);
        s
    }

    #[test]
    fn test_linear_wrap_scores_once() {
        let mut s = staged(vec![python(100, Vec2::new(-40.0, 100.0), 4.0, StrategyKind::Linear)]);
        let report = tick(&mut s, &TickInput::default());

        assert_eq!(report.wraps(), 1);
        assert_eq!(s.score, 1);
        assert_eq!(s.score_label.text, "Score: 1");
        let o = &s.obstacles[0];
        assert_eq!(o.pos.x, 1120.0);
        assert!((0.0..=660.0).contains(&o.pos.y));

        // Next tick: back on screen, no second wrap
        let report = tick(&mut s, &TickInput::default());
        assert_eq!(report.wraps(), 0);
        assert_eq!(s.score, 1);
    }

    #[test]
    fn test_collision_replaces_and_costs_health() {
        let mut s = staged(vec![python(100, Vec2::new(520.0, 610.0), 3.0, StrategyKind::Linear)]);
        let report = tick(&mut s, &TickInput::default());

        assert_eq!(report.hits(), 1);
        assert_eq!(s.health, 2);
        assert_eq!(s.health_label.text, "Health: 2");
        assert_eq!(s.score, 0, "collisions never score");
        assert_eq!(s.obstacles.len(), 1);
        assert_ne!(s.obstacles[0].id, 100);
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_each_overlap_costs_one_health() {
        let mut s = staged(vec![
            python(100, Vec2::new(520.0, 610.0), 3.0, StrategyKind::Linear),
            python(101, Vec2::new(530.0, 620.0), 3.0, StrategyKind::Linear),
        ]);
        let report = tick(&mut s, &TickInput::default());
        assert_eq!(report.hits(), 2);
        assert_eq!(s.health, 1);
        assert_eq!(s.obstacles.len(), 2);
    }

    #[test]
    fn test_last_health_ends_game_and_freezes() {
        let mut s = staged(vec![python(100, Vec2::new(520.0, 610.0), 3.0, StrategyKind::Linear)]);
        s.health = 1;
        let report = tick(&mut s, &TickInput::default());
        assert_eq!(s.health, 0);
        assert_eq!(s.phase, GamePhase::GameOver);
        assert!(report.contains(&GameEvent::GameOver));

        let before: Vec<_> = s.obstacles.iter().map(|o| o.pos).collect();
        let ticks = s.time_ticks;
        let report = tick(&mut s, &TickInput::default());
        let after: Vec<_> = s.obstacles.iter().map(|o| o.pos).collect();
        assert!(report.events.is_empty());
        assert_eq!(before, after);
        assert_eq!(ticks, s.time_ticks);
    }

    #[test]
    fn test_pause_blocks_updates() {
        let mut s = staged(vec![python(100, Vec2::new(300.0, 100.0), 3.0, StrategyKind::Linear)]);
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let report = tick(&mut s, &pause);
        assert!(report.contains(&GameEvent::Paused));
        assert_eq!(s.phase, GamePhase::Paused);

        tick(&mut s, &TickInput::default());
        assert_eq!(s.obstacles[0].pos.x, 300.0);

        let report = tick(&mut s, &pause);
        assert!(report.contains(&GameEvent::Resumed));
        assert_eq!(s.phase, GamePhase::Playing);
        assert_eq!(s.obstacles[0].pos.x, 297.0);
    }

    #[test]
    fn test_player_moves_with_input() {
        let mut s = staged(Vec::new());
        let input = TickInput {
            held: HeldDirections {
                up: true,
                right: true,
                ..HeldDirections::NONE
            },
            pause: false,
        };
        tick(&mut s, &input);
        assert_eq!(s.player.pos, Vec2::new(506.0, 594.0));
    }

    #[test]
    fn test_label_contact_is_informational() {
        let mut s = staged(Vec::new());
        s.player.pos = Vec2::new(0.0, 0.0);
        let (score, health, phase) = (s.score, s.health, s.phase);
        let report = tick(&mut s, &TickInput::default());
        assert!(report.contains(&GameEvent::LabelContact(HudSlot::Score)));
        assert_eq!((s.score, s.health, s.phase), (score, health, phase));
    }

    #[test]
    fn test_story_cutscene_only_animates_bird() {
        let mut s = session(Difficulty::Story, 5);
        assert_eq!(s.phase, GamePhase::Story(StoryScene::Delivery));
        let obstacles: Vec<_> = s.obstacles.iter().map(|o| o.pos).collect();
        let anchor = s.story_bird.as_ref().unwrap().pos;

        for _ in 0..30 {
            tick(&mut s, &TickInput::default());
        }
        let now: Vec<_> = s.obstacles.iter().map(|o| o.pos).collect();
        assert_eq!(obstacles, now);
        let bird = s.story_bird.as_ref().unwrap();
        assert_eq!(bird.pos.x, anchor.x);
        assert_ne!(bird.pos.y, anchor.y);
    }

    #[test]
    fn test_determinism() {
        let mut a = session(Difficulty::Hard, 99999);
        let mut b = session(Difficulty::Hard, 99999);
        let input = TickInput {
            held: HeldDirections {
                right: true,
                down: true,
                ..HeldDirections::NONE
            },
            pause: false,
        };
        for _ in 0..600 {
            tick(&mut a, &input);
            tick(&mut b, &input);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.health, b.health);
        assert_eq!(a.phase, b.phase);
        let pa: Vec<_> = a.obstacles.iter().map(|o| (o.id, o.pos)).collect();
        let pb: Vec<_> = b.obstacles.iter().map(|o| (o.id, o.pos)).collect();
        assert_eq!(pa, pb);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_health_and_score_invariants(
            seed in any::<u64>(),
            moves in proptest::collection::vec(0u8..16, 1..400),
        ) {
            let mut s = session(Difficulty::Hard, seed);
            let mut health = s.health;
            let mut score = s.score;
            for bits in moves {
                let input = TickInput {
                    held: HeldDirections {
                        up: bits & 1 != 0,
                        down: bits & 2 != 0,
                        left: bits & 4 != 0,
                        right: bits & 8 != 0,
                    },
                    pause: false,
                };
                let was_over = s.phase == GamePhase::GameOver;
                let report = tick(&mut s, &input);

                prop_assert!(s.health <= health);
                prop_assert!(s.score >= score);
                prop_assert_eq!(s.score - score, report.wraps() as u32);
                prop_assert_eq!(s.obstacles.len(), Difficulty::Hard.obstacle_count());
                if was_over {
                    prop_assert_eq!(s.health, health);
                    prop_assert!(report.events.is_empty());
                }
                if s.health == 0 {
                    prop_assert_eq!(s.phase, GamePhase::GameOver);
                }
                health = s.health;
                score = s.score;
            }
        }
    }
}
