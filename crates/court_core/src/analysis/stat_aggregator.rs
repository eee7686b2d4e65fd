//! # Stat Aggregator
//!
//! Turns shot frames and mini-court trajectories into a per-frame stats table.
//!
//! ## Algorithm
//! For every consecutive shot pair `(start, end)`:
//! 1. `elapsed = (end - start) / fps`
//! 2. Ball displacement in mini-court pixels, converted to meters with the
//!    global mini-court scale, divided by `elapsed`
//! 3. Striker = player nearest the ball at `start`; the other player is the
//!    opponent and their displacement over the interval is their movement
//! 4. A snapshot at `start` copies the previous one and adds this interval
//!
//! Snapshots are then forward filled over every frame, with a zero
//! baseline before the first shot.

use crate::court::{measure_distance, speed_kmh, MiniCourtGeometry};
use crate::error::{PipelineError, Result};
use crate::models::{PlayerSlot, TrackId};
use crate::projection::MiniCourtTrajectories;
use crate::tracking::SelectedPlayers;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Running totals of one player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub shot_count: u32,
    pub total_shot_speed_kmh: f64,
    pub last_shot_speed_kmh: f64,
    pub total_movement_speed_kmh: f64,
    pub last_movement_speed_kmh: f64,
}

/// Stats of both players as of one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatsSnapshot {
    pub frame_index: usize,
    pub players: [PlayerStats; 2],
}

impl PlayerStatsSnapshot {
    #[inline]
    pub fn player(&self, slot: PlayerSlot) -> &PlayerStats {
        &self.players[slot.index()]
    }

    /// Mean ball speed of `slot`'s shots; `None` before their first shot.
    pub fn avg_shot_speed(&self, slot: PlayerSlot) -> Option<f64> {
        let stats = self.player(slot);
        (stats.shot_count > 0).then(|| stats.total_shot_speed_kmh / f64::from(stats.shot_count))
    }

    /// Mean movement speed of `slot`.
    ///
    /// A player moves once per opponent shot, so the divisor is the
    /// opponent's shot count.
    pub fn avg_movement_speed(&self, slot: PlayerSlot) -> Option<f64> {
        let stats = self.player(slot);
        let opponent_shots = self.player(slot.other()).shot_count;
        (opponent_shots > 0).then(|| stats.total_movement_speed_kmh / f64::from(opponent_shots))
    }

    fn record(&mut self, shot: &ShotRecord) {
        let striker = &mut self.players[shot.striker.index()];
        striker.shot_count += 1;
        striker.total_shot_speed_kmh += shot.ball_speed_kmh;
        striker.last_shot_speed_kmh = shot.ball_speed_kmh;

        let opponent = &mut self.players[shot.striker.other().index()];
        opponent.total_movement_speed_kmh += shot.opponent_speed_kmh;
        opponent.last_movement_speed_kmh = shot.opponent_speed_kmh;
    }
}

/// Exactly one snapshot per frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    snapshots: Vec<PlayerStatsSnapshot>,
}

impl StatsTable {
    /// Forward fill sparse snapshots (sorted by frame) over `[0, frame_count)`.
    pub fn forward_fill(sparse: &[PlayerStatsSnapshot], frame_count: usize) -> Self {
        let mut snapshots = Vec::with_capacity(frame_count);
        let mut current = PlayerStatsSnapshot::default();
        let mut pending = sparse.iter().peekable();

        for frame_index in 0..frame_count {
            while let Some(next) = pending.next_if(|s| s.frame_index <= frame_index) {
                current = *next;
            }
            snapshots.push(PlayerStatsSnapshot { frame_index, ..current });
        }
        Self { snapshots }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn get(&self, frame: usize) -> Option<&PlayerStatsSnapshot> {
        self.snapshots.get(frame)
    }

    pub fn last(&self) -> Option<&PlayerStatsSnapshot> {
        self.snapshots.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerStatsSnapshot> {
        self.snapshots.iter()
    }

    pub fn snapshots(&self) -> &[PlayerStatsSnapshot] {
        &self.snapshots
    }
}

/// A detected shot and who hit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotEvent {
    pub frame_index: usize,
    /// `None` when the ball or both players were not located at that frame
    pub striker: Option<PlayerSlot>,
}

/// Kinematics of one interval between consecutive shots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub start_frame: usize,
    pub end_frame: usize,
    pub elapsed_s: f64,
    pub striker: PlayerSlot,
    pub striker_track_id: TrackId,
    pub ball_distance_m: f64,
    pub ball_speed_kmh: f64,
    pub opponent_distance_m: f64,
    pub opponent_speed_kmh: f64,
}

/// Everything the aggregator derives from one match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchStats {
    pub shot_events: Vec<ShotEvent>,
    pub shots: Vec<ShotRecord>,
    pub table: StatsTable,
}

/// Sequential aggregation over shot intervals.
#[derive(Debug, Clone, Copy)]
pub struct StatAggregator<'a> {
    geometry: &'a MiniCourtGeometry,
    frame_rate_fps: f64,
}

impl<'a> StatAggregator<'a> {
    pub fn new(geometry: &'a MiniCourtGeometry, frame_rate_fps: f64) -> Self {
        Self { geometry, frame_rate_fps }
    }

    /// Build shot records and the per-frame table.
    ///
    /// `shots` must be strictly increasing frame indices inside the trajectories.
    pub fn aggregate(
        &self,
        shots: &[usize],
        trajectories: &MiniCourtTrajectories,
        selected: SelectedPlayers,
    ) -> Result<MatchStats> {
        let frame_count = trajectories.len();
        if trajectories.ball.len() != frame_count {
            return Err(PipelineError::TrajectoryLengthMismatch {
                expected: frame_count,
                found: trajectories.ball.len(),
            });
        }
        if let Some(&frame) = shots.iter().find(|&&f| f >= frame_count) {
            return Err(PipelineError::ShotFrameOutOfRange { frame, frame_count });
        }
        if let Some(pair) = shots.windows(2).find(|w| w[0] >= w[1]) {
            return Err(PipelineError::UnorderedShotFrames { previous: pair[0], frame: pair[1] });
        }

        let shot_events = shots
            .iter()
            .map(|&frame_index| ShotEvent {
                frame_index,
                striker: striker_at(trajectories, frame_index),
            })
            .collect();

        let mut records = Vec::with_capacity(shots.len().saturating_sub(1));
        let mut sparse: Vec<PlayerStatsSnapshot> = Vec::with_capacity(shots.len());
        let mut running = PlayerStatsSnapshot::default();

        for pair in shots.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            let Some(record) = self.interval(trajectories, selected, start, end) else {
                tracing::warn!(start, end, "shot interval skipped: positions missing");
                continue;
            };

            running.record(&record);
            running.frame_index = start;
            sparse.push(running);
            records.push(record);
        }

        let table = StatsTable::forward_fill(&sparse, frame_count);
        tracing::info!(
            frame_count,
            shots = shots.len(),
            intervals = records.len(),
            "stats aggregated"
        );

        Ok(MatchStats { shot_events, shots: records, table })
    }

    fn interval(
        &self,
        trajectories: &MiniCourtTrajectories,
        selected: SelectedPlayers,
        start: usize,
        end: usize,
    ) -> Option<ShotRecord> {
        let elapsed_s = (end - start) as f64 / self.frame_rate_fps;

        let ball_start = trajectories.ball(start)?;
        let ball_end = trajectories.ball(end)?;
        let ball_distance_m = self.distance_m(ball_start, ball_end);

        let striker = striker_at(trajectories, start)?;
        let opponent = striker.other();
        let opponent_start = trajectories.player(opponent, start)?;
        let opponent_end = trajectories.player(opponent, end)?;
        let opponent_distance_m = self.distance_m(opponent_start, opponent_end);

        Some(ShotRecord {
            start_frame: start,
            end_frame: end,
            elapsed_s,
            striker,
            striker_track_id: selected.id(striker),
            ball_distance_m,
            ball_speed_kmh: speed_kmh(ball_distance_m, elapsed_s),
            opponent_distance_m,
            opponent_speed_kmh: speed_kmh(opponent_distance_m, elapsed_s),
        })
    }

    #[inline]
    fn distance_m(&self, from: Point2<f64>, to: Point2<f64>) -> f64 {
        self.geometry.pixels_to_meters(measure_distance(from, to))
    }
}

/// Player nearest the ball on the mini-court at `frame`.
fn striker_at(trajectories: &MiniCourtTrajectories, frame: usize) -> Option<PlayerSlot> {
    let ball = trajectories.ball(frame)?;
    PlayerSlot::ALL
        .into_iter()
        .filter_map(|slot| trajectories.player(slot, frame).map(|p| (slot, measure_distance(p, ball))))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(slot, _)| slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CourtDimensions, MiniCourtConfig};
    use proptest::prelude::*;

    fn geometry() -> MiniCourtGeometry {
        MiniCourtGeometry::build(1920, 1080, &MiniCourtConfig::default(), &CourtDimensions::default())
    }

    /// 60 frames; player 1 stays at the top, player 2 walks down 40 px, the
    /// ball travels from (100, 100) at frame 10 to (100, 400) at frame 58.
    fn rally() -> MiniCourtTrajectories {
        let frames = 60;
        let mut players = Vec::with_capacity(frames);
        let mut ball = Vec::with_capacity(frames);
        for f in 0..frames {
            let t = f as f64 / (frames - 1) as f64;
            players.push([
                Some(Point2::new(100.0, 90.0)),
                Some(Point2::new(100.0, 420.0 + 40.0 * t)),
            ]);
            let y = if f <= 10 {
                100.0
            } else if f >= 58 {
                400.0
            } else {
                100.0 + 300.0 * (f - 10) as f64 / 48.0
            };
            ball.push(Some(Point2::new(100.0, y)));
        }
        MiniCourtTrajectories { players, ball }
    }

    #[test]
    fn test_single_interval_scenario() {
        let geometry = geometry();
        assert_eq!(geometry.court_width_px(), 210.0);

        let stats = StatAggregator::new(&geometry, 24.0)
            .aggregate(&[10, 58], &rally(), SelectedPlayers::new(7, 12))
            .unwrap();

        assert_eq!(stats.shots.len(), 1);
        let record = &stats.shots[0];
        assert_eq!(record.striker, PlayerSlot::One);
        assert_eq!(record.striker_track_id, 7);
        assert_eq!(record.elapsed_s, 2.0);
        assert!((record.ball_speed_kmh - 28.21).abs() < 0.01, "{}", record.ball_speed_kmh);

        let table = &stats.table;
        assert_eq!(table.len(), 60);
        assert_eq!(*table.get(9).unwrap().player(PlayerSlot::One), PlayerStats::default());

        for frame in 10..60 {
            let snapshot = table.get(frame).unwrap();
            assert_eq!(snapshot.frame_index, frame);
            assert_eq!(snapshot.player(PlayerSlot::One).shot_count, 1);
            assert_eq!(snapshot.player(PlayerSlot::Two).shot_count, 0);
            assert!((snapshot.avg_shot_speed(PlayerSlot::One).unwrap() - 28.21).abs() < 0.01);
        }

        let opponent = table.last().unwrap().player(PlayerSlot::Two);
        assert!(opponent.last_movement_speed_kmh > 0.0);
        assert_eq!(opponent.total_movement_speed_kmh, record.opponent_speed_kmh);
    }

    #[test]
    fn test_average_sentinel() {
        let snapshot = PlayerStatsSnapshot::default();
        assert_eq!(snapshot.avg_shot_speed(PlayerSlot::One), None);
        assert_eq!(snapshot.avg_movement_speed(PlayerSlot::Two), None);

        let geometry = geometry();
        let stats = StatAggregator::new(&geometry, 24.0)
            .aggregate(&[10, 58], &rally(), SelectedPlayers::new(7, 12))
            .unwrap();
        let last = stats.table.last().unwrap();
        // player 2 never hit the ball but did move during player 1's shot
        assert_eq!(last.avg_shot_speed(PlayerSlot::Two), None);
        assert!(last.avg_movement_speed(PlayerSlot::Two).is_some());
        assert_eq!(last.avg_movement_speed(PlayerSlot::One), None);
    }

    #[test]
    fn test_shot_events_cover_every_shot() {
        let geometry = geometry();
        let stats = StatAggregator::new(&geometry, 24.0)
            .aggregate(&[10, 58], &rally(), SelectedPlayers::new(7, 12))
            .unwrap();
        assert_eq!(
            stats.shot_events,
            vec![
                ShotEvent { frame_index: 10, striker: Some(PlayerSlot::One) },
                ShotEvent { frame_index: 58, striker: Some(PlayerSlot::Two) },
            ]
        );
    }

    #[test]
    fn test_no_shots_gives_zero_table() {
        let geometry = geometry();
        let stats = StatAggregator::new(&geometry, 24.0)
            .aggregate(&[], &rally(), SelectedPlayers::new(7, 12))
            .unwrap();
        assert!(stats.shots.is_empty());
        assert_eq!(stats.table.len(), 60);
        assert!(stats.table.iter().all(|s| s.players == [PlayerStats::default(); 2]));
    }

    #[test]
    fn test_interval_with_missing_ball_is_skipped() {
        let geometry = geometry();
        let mut trajectories = rally();
        trajectories.ball[10] = None;
        let stats = StatAggregator::new(&geometry, 24.0)
            .aggregate(&[10, 58], &trajectories, SelectedPlayers::new(7, 12))
            .unwrap();
        assert!(stats.shots.is_empty());
        assert_eq!(stats.shot_events[0].striker, None);
        assert_eq!(stats.table.last().unwrap().players, [PlayerStats::default(); 2]);
    }

    #[test]
    fn test_shot_out_of_range() {
        let geometry = geometry();
        let err = StatAggregator::new(&geometry, 24.0)
            .aggregate(&[10, 60], &rally(), SelectedPlayers::new(7, 12))
            .unwrap_err();
        assert!(matches!(err, PipelineError::ShotFrameOutOfRange { frame: 60, frame_count: 60 }));
    }

    #[test]
    fn test_decreasing_shots_rejected() {
        let geometry = geometry();
        let err = StatAggregator::new(&geometry, 24.0)
            .aggregate(&[10, 5], &rally(), SelectedPlayers::new(7, 12))
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnorderedShotFrames { previous: 10, frame: 5 }));
    }

    #[test]
    fn test_duplicate_shot_rejected() {
        let geometry = geometry();
        let err = StatAggregator::new(&geometry, 24.0)
            .aggregate(&[5, 5, 9], &rally(), SelectedPlayers::new(7, 12))
            .unwrap_err();
        assert!(matches!(err, PipelineError::UnorderedShotFrames { previous: 5, frame: 5 }));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn test_trajectory_length_mismatch() {
        let geometry = geometry();
        let mut trajectories = rally();
        trajectories.ball.pop();
        let err = StatAggregator::new(&geometry, 24.0)
            .aggregate(&[10], &trajectories, SelectedPlayers::new(7, 12))
            .unwrap_err();
        assert!(matches!(err, PipelineError::TrajectoryLengthMismatch { expected: 60, found: 59 }));
    }

    proptest! {
        #[test]
        fn prop_cumulative_fields_never_decrease(
            positions in proptest::collection::vec(
                (0.0f64..250.0, 0.0f64..500.0, 0.0f64..250.0, 0.0f64..500.0, 0.0f64..250.0, 0.0f64..500.0),
                40..120,
            ),
            raw_shots in proptest::collection::btree_set(0usize..40, 0..8),
        ) {
            let trajectories = MiniCourtTrajectories {
                players: positions
                    .iter()
                    .map(|p| [Some(Point2::new(p.0, p.1)), Some(Point2::new(p.2, p.3))])
                    .collect(),
                ball: positions.iter().map(|p| Some(Point2::new(p.4, p.5))).collect(),
            };
            let shots: Vec<usize> = raw_shots.into_iter().collect();
            let geometry = geometry();
            let stats = StatAggregator::new(&geometry, 24.0)
                .aggregate(&shots, &trajectories, SelectedPlayers::new(1, 2))
                .unwrap();

            prop_assert_eq!(stats.table.len(), positions.len());
            for pair in stats.table.snapshots().windows(2) {
                for slot in PlayerSlot::ALL {
                    let (a, b) = (pair[0].player(slot), pair[1].player(slot));
                    prop_assert!(b.shot_count >= a.shot_count);
                    prop_assert!(b.total_shot_speed_kmh >= a.total_shot_speed_kmh);
                    prop_assert!(b.total_movement_speed_kmh >= a.total_movement_speed_kmh);
                }
            }
        }
    }
}
