//! Unit tests for gw-mobility.

#[cfg(test)]
mod helpers {
    use gw_core::{AgentId, Cell, Direction, Footprint, GridBounds, Pose};
    use gw_grid::OccupancyGrid;

    use crate::MobilityEngine;

    pub const TPS: u32 = 30;

    pub fn world(w: u32, h: u32) -> (MobilityEngine, OccupancyGrid) {
        (MobilityEngine::new(), OccupancyGrid::new(GridBounds::new(w, h)))
    }

    pub fn spawn_single(
        engine: &mut MobilityEngine,
        grid:   &mut OccupancyGrid,
        at:     Cell,
        speed:  f64,
    ) -> AgentId {
        engine
            .spawn(grid, Pose::new(at, Direction::N, Footprint::Single), speed)
            .unwrap()
    }

    /// Every live agent owns exactly its footprint.  The owner layer holds
    /// one agent per cell, so this also proves footprints are disjoint.
    pub fn assert_footprints_consistent(engine: &MobilityEngine, grid: &OccupancyGrid) {
        for (agent, state) in engine.store.iter() {
            let mut want = state.pose.cells();
            want.sort();
            let mut got = grid.owned_cells(agent);
            got.sort();
            assert_eq!(got, want, "{agent} footprint out of sync with grid");
        }
    }
}

// ── Integration of progress ───────────────────────────────────────────────────

#[cfg(test)]
mod advance {
    use gw_core::{Cell, Direction};

    use super::helpers::{spawn_single, world, TPS};
    use crate::{MotionStatus, MoveEvent};

    #[test]
    fn speed_equal_to_tick_rate_moves_one_cell_per_tick() {
        let (mut engine, mut grid) = world(10, 3);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(0, 1), TPS as f64);
        engine.install_route(&mut grid, a, vec![Direction::E; 5]).unwrap();

        for t in 1..=5 {
            let reports = engine.advance_all(&mut grid, TPS);
            assert_eq!(reports.len(), 1);
            assert_eq!(reports[0].1.cells_moved, 1, "tick {t}");
            assert_eq!(engine.state(a).unwrap().pose.anchor, Cell::new(t, 1));
        }
        let state = engine.state(a).unwrap();
        assert!(state.is_stationary());
        assert_eq!(state.status, MotionStatus::Idle);
    }

    #[test]
    fn steps_remaining_counts_step_in_progress() {
        let (mut engine, mut grid) = world(10, 3);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(0, 1), TPS as f64);
        engine.install_route(&mut grid, a, vec![Direction::E; 3]).unwrap();
        assert_eq!(engine.state(a).unwrap().steps_remaining(), 3);

        for left in [2, 1, 0] {
            engine.advance_all(&mut grid, TPS);
            assert_eq!(engine.state(a).unwrap().steps_remaining(), left);
        }
    }

    #[test]
    fn arrival_reported_on_last_step() {
        let (mut engine, mut grid) = world(10, 3);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(0, 1), TPS as f64);
        engine.install_route(&mut grid, a, vec![Direction::E; 2]).unwrap();

        let first = engine.advance_all(&mut grid, TPS);
        assert_eq!(first[0].1.event, None);
        let second = engine.advance_all(&mut grid, TPS);
        assert_eq!(second[0].1.event, Some(MoveEvent::Arrived { at: Cell::new(2, 1) }));
        assert!(engine.advance_all(&mut grid, TPS).is_empty());
    }

    #[test]
    fn fractional_speed_accumulates() {
        let (mut engine, mut grid) = world(10, 3);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(0, 1), 10.0);
        engine.install_route(&mut grid, a, vec![Direction::E; 4]).unwrap();

        let mut moved = 0;
        for _ in 0..9 {
            moved += engine
                .advance_all(&mut grid, TPS)
                .iter()
                .map(|(_, r)| r.cells_moved)
                .sum::<u32>();
        }
        // 9 ticks × 1/3 cell = 3 cells (within float tolerance of the third).
        assert!((2..=3).contains(&moved), "moved {moved}");
    }

    #[test]
    fn fast_agent_takes_several_cells_in_one_tick() {
        let (mut engine, mut grid) = world(10, 3);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(0, 1), 3.0 * TPS as f64);
        engine.install_route(&mut grid, a, vec![Direction::E; 6]).unwrap();
        let reports = engine.advance_all(&mut grid, TPS);
        assert_eq!(reports[0].1.cells_moved, 3);
        assert_eq!(engine.state(a).unwrap().pose.anchor, Cell::new(3, 1));
    }

    #[test]
    fn idle_agent_does_not_bank_progress() {
        let (mut engine, mut grid) = world(5, 5);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(2, 2), 45.0);
        for _ in 0..10 {
            engine.advance_all(&mut grid, TPS);
        }
        assert_eq!(engine.state(a).unwrap().progress, 0.0);
    }

    #[test]
    fn diagonal_route_turns_and_moves() {
        let (mut engine, mut grid) = world(5, 5);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(0, 0), TPS as f64);
        engine.install_route(&mut grid, a, vec![Direction::NE; 4]).unwrap();
        assert_eq!(engine.state(a).unwrap().pose.facing, Direction::NE);
        for _ in 0..4 {
            engine.advance_all(&mut grid, TPS);
        }
        assert_eq!(engine.state(a).unwrap().pose.anchor, Cell::new(4, 4));
        assert_eq!(grid.cell_owner(Cell::new(4, 4)), Some(a));
        assert_eq!(grid.cell_owner(Cell::new(0, 0)), None);
    }
}

// ── Reservations & blocking ───────────────────────────────────────────────────

#[cfg(test)]
mod blocking {
    use gw_core::{Cell, Direction, Footprint, Pose};

    use super::helpers::{assert_footprints_consistent, spawn_single, world, TPS};
    use crate::{MotionStatus, MoveEvent};

    #[test]
    fn next_cell_is_reserved_ahead() {
        let (mut engine, mut grid) = world(6, 3);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(0, 1), TPS as f64);
        engine.install_route(&mut grid, a, vec![Direction::E; 3]).unwrap();
        assert_eq!(grid.cell_reserver(Cell::new(1, 1)), Some(a));
        assert_eq!(grid.cell_owner(Cell::new(1, 1)), None);

        engine.advance_all(&mut grid, TPS);
        assert_eq!(grid.cell_owner(Cell::new(1, 1)), Some(a));
        assert_eq!(grid.cell_reserver(Cell::new(2, 1)), Some(a));
    }

    #[test]
    fn halts_in_front_of_an_occupied_cell() {
        let (mut engine, mut grid) = world(6, 3);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(0, 1), TPS as f64);
        spawn_single(&mut engine, &mut grid, Cell::new(2, 1), TPS as f64);
        engine.install_route(&mut grid, a, vec![Direction::E; 4]).unwrap();

        let reports = engine.advance_all(&mut grid, TPS);
        let (_, report) = reports.iter().find(|(id, _)| *id == a).unwrap();
        assert_eq!(report.cells_moved, 1);
        assert_eq!(
            report.event,
            Some(MoveEvent::Blocked { at: Cell::new(1, 1), toward: Direction::E })
        );
        let state = engine.state(a).unwrap();
        assert!(state.is_stationary());
        assert_eq!(state.status, MotionStatus::Blocked);
        assert_footprints_consistent(&engine, &grid);
    }

    #[test]
    fn blocked_first_step_reported_on_install() {
        let (mut engine, mut grid) = world(6, 3);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(0, 1), TPS as f64);
        spawn_single(&mut engine, &mut grid, Cell::new(1, 1), TPS as f64);
        let event = engine.install_route(&mut grid, a, vec![Direction::E]).unwrap();
        assert!(matches!(event, Some(MoveEvent::Blocked { .. })));
    }

    #[test]
    fn reservation_excludes_a_second_mover() {
        let (mut engine, mut grid) = world(3, 1);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(0, 0), TPS as f64);
        let b = spawn_single(&mut engine, &mut grid, Cell::new(2, 0), TPS as f64);
        assert_eq!(engine.install_route(&mut grid, a, vec![Direction::E]).unwrap(), None);
        let event = engine.install_route(&mut grid, b, vec![Direction::W]).unwrap();
        assert!(matches!(event, Some(MoveEvent::Blocked { .. })));

        engine.advance_all(&mut grid, TPS);
        assert_eq!(grid.cell_owner(Cell::new(1, 0)), Some(a));
        assert_eq!(engine.state(b).unwrap().pose.anchor, Cell::new(2, 0));
    }

    #[test]
    fn pair_footprint_turns_and_drags_its_tail() {
        let (mut engine, mut grid) = world(5, 5);
        let pose = Pose::new(Cell::new(1, 1), Direction::E, Footprint::Pair);
        let a = engine.spawn(&mut grid, pose, TPS as f64).unwrap();
        assert_eq!(grid.owned_cells(a), vec![Cell::new(0, 1), Cell::new(1, 1)]);

        engine.install_route(&mut grid, a, vec![Direction::N, Direction::N]).unwrap();
        // Turned north in place: tail now below the head.
        let mut owned = grid.owned_cells(a);
        owned.sort();
        assert_eq!(owned, vec![Cell::new(1, 0), Cell::new(1, 1)]);

        engine.advance_all(&mut grid, TPS);
        engine.advance_all(&mut grid, TPS);
        let mut owned = grid.owned_cells(a);
        owned.sort();
        assert_eq!(owned, vec![Cell::new(1, 2), Cell::new(1, 3)]);
        assert_footprints_consistent(&engine, &grid);
    }

    #[test]
    fn replan_releases_reservations() {
        let (mut engine, mut grid) = world(6, 6);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(2, 2), TPS as f64);
        engine.install_route(&mut grid, a, vec![Direction::E; 3]).unwrap();
        assert_eq!(grid.reserved_cells(a).len(), 2);

        engine.begin_replan(&mut grid, a, Cell::new(0, 0)).unwrap();
        engine.begin_replan(&mut grid, a, Cell::new(5, 5)).unwrap();
        assert_eq!(grid.reserved_cells(a), vec![Cell::new(2, 2)]);
        let state = engine.state(a).unwrap();
        assert_eq!(state.status, MotionStatus::AwaitingPath);
        assert_eq!(state.goal, Some(Cell::new(5, 5)));
    }
}

// ── Spawning & jobs ───────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use gw_core::{AgentId, Cell, Direction, Footprint, Pose};
    use gw_grid::GridError;
    use gw_path::JobSource;

    use super::helpers::{spawn_single, world, TPS};
    use crate::MobilityError;

    #[test]
    fn spawn_onto_occupied_cell_fails() {
        let (mut engine, mut grid) = world(4, 4);
        spawn_single(&mut engine, &mut grid, Cell::new(1, 1), 1.0);
        let err = engine
            .spawn(&mut grid, Pose::new(Cell::new(1, 2), Direction::N, Footprint::Pair), 1.0)
            .unwrap_err();
        assert!(matches!(err, MobilityError::Grid(GridError::Blocked { .. })));
        assert_eq!(engine.store.len(), 1);
    }

    #[test]
    fn despawn_frees_cells_and_ids_are_not_reused() {
        let (mut engine, mut grid) = world(4, 4);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(1, 1), TPS as f64);
        engine.install_route(&mut grid, a, vec![Direction::E]).unwrap();
        engine.despawn(&mut grid, a).unwrap();
        assert!(grid.reserved_cells(a).is_empty());
        assert!(matches!(engine.despawn(&mut grid, a), Err(MobilityError::UnknownAgent(_))));

        let b = spawn_single(&mut engine, &mut grid, Cell::new(1, 1), 1.0);
        assert_ne!(a, b);
        assert!(engine.store.get(a).is_none());
    }

    #[test]
    fn unknown_agent_errors() {
        let (mut engine, mut grid) = world(4, 4);
        let ghost = AgentId(3);
        assert!(engine.install_route(&mut grid, ghost, vec![]).is_err());
        assert!(engine.begin_replan(&mut grid, ghost, Cell::new(0, 0)).is_err());
        assert!(engine.abandon_route(ghost).is_err());
    }

    #[test]
    fn world_view_builds_jobs_from_live_state() {
        let (mut engine, mut grid) = world(6, 6);
        let a = spawn_single(&mut engine, &mut grid, Cell::new(1, 1), 1.0);
        spawn_single(&mut engine, &mut grid, Cell::new(3, 3), 1.0);

        let view = engine.view(&grid);
        let job = view.job_for(a, Cell::new(5, 5)).unwrap();
        assert_eq!(job.start, Cell::new(1, 1));
        assert!(!job.snapshot.is_blocked(Cell::new(1, 1)));
        assert!(job.snapshot.is_blocked(Cell::new(3, 3)));
        assert!(view.job_for(AgentId(99), Cell::new(0, 0)).is_none());
    }
}

// ── Soak ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod soak {
    use gw_core::{Direction, Footprint, Pose, SimRng};

    use super::helpers::{assert_footprints_consistent, world, TPS};

    #[test]
    fn random_walkers_never_overlap() {
        let (mut engine, mut grid) = world(12, 12);
        let mut rng = SimRng::new(7);
        let shapes = [Footprint::Single, Footprint::Pair];

        let mut agents = Vec::new();
        while agents.len() < 14 {
            let footprint = rng.choose(&shapes).cloned().unwrap_or(Footprint::Single);
            let facing = *rng.choose(&Direction::ALL).unwrap_or(&Direction::N);
            let pose = Pose::new(rng.cell_in(grid.bounds()), facing, footprint);
            let speed = rng.gen_range(10.0..60.0);
            if let Ok(id) = engine.spawn(&mut grid, pose, speed) {
                agents.push(id);
            }
        }

        for _ in 0..400 {
            for &a in &agents {
                if engine.state(a).unwrap().is_stationary() {
                    let steps = rng.gen_range(1..6);
                    let dirs = (0..steps)
                        .map(|_| *rng.choose(&Direction::ALL).unwrap_or(&Direction::N))
                        .collect();
                    engine.install_route(&mut grid, a, dirs).unwrap();
                }
            }
            engine.advance_all(&mut grid, TPS);
            assert_footprints_consistent(&engine, &grid);
        }
    }
}
