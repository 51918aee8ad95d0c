//! Shared harness for the engine integration tests.
//!
//! [`Level`] is a small but complete stand-in for a running level: a world of
//! walkers spawned at the release rate, a skill panel with limited uses, and
//! a victory tracker. It subscribes to the clock as a [`TickListener`] and
//! forwards the pre-tick hook to its [`CommandLog`], building the facades
//! bundle from its own fields for each call.

#![allow(dead_code)]

use burrow_engine::prelude::*;

/// Walkers past this column leave the level.
pub const EXIT_X: i32 = 120;
/// Spawn credit needed per walker.
pub const SPAWN_COST: i32 = 100;

// ---------------------------------------------------------------------------
// Tracing
// ---------------------------------------------------------------------------

/// Install a test-writer subscriber once. Filter with `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Walker {
    pub x: i32,
    pub skill: Option<Skill>,
}

#[derive(Debug, Default)]
pub struct World {
    pub walkers: EntityArena<Walker>,
    pub nuking: bool,
    pub saved: u32,
    pub lost: u32,
}

impl World {
    fn step(&mut self) {
        if self.nuking {
            if let Some(first) = self.walkers.ids().first().copied() {
                self.walkers.remove(first);
                self.lost += 1;
            }
        }

        let mut exited = Vec::new();
        for (id, walker) in self.walkers.iter_mut() {
            walker.x += match walker.skill {
                Some(Skill::Blocker) => 0,
                Some(Skill::Climber) | Some(Skill::Floater) => 2,
                _ => 1,
            };
            if walker.x >= EXIT_X {
                exited.push(id);
            }
        }
        for id in exited {
            self.walkers.remove(id);
            self.saved += 1;
        }
    }
}

impl WorldFacade for World {
    fn entity_ids(&self) -> Vec<EntityId> {
        self.walkers.ids()
    }

    fn has_entity(&self, id: EntityId) -> bool {
        self.walkers.contains(id)
    }

    fn apply_action_to_entity(&mut self, id: EntityId, skill: Skill) -> bool {
        match self.walkers.get_mut(id) {
            Some(walker) if walker.skill != Some(skill) => {
                walker.skill = Some(skill);
                true
            }
            _ => false,
        }
    }

    fn is_nuking(&self) -> bool {
        self.nuking
    }

    fn nuke_all(&mut self) {
        self.nuking = true;
    }
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SkillPanel {
    pub selected: Option<Skill>,
    pub uses: [u32; 8],
}

impl SkillPanel {
    pub fn with_uses(uses: u32) -> Self {
        Self {
            selected: None,
            uses: [uses; 8],
        }
    }
}

impl SkillsFacade for SkillPanel {
    fn selected_skill(&self) -> Option<Skill> {
        self.selected
    }

    fn can_use_skill(&self, skill: Skill) -> bool {
        self.uses[skill.index() as usize] > 0
    }

    fn use_skill(&mut self, skill: Skill) -> bool {
        let left = &mut self.uses[skill.index() as usize];
        if *left == 0 {
            return false;
        }
        *left -= 1;
        true
    }

    fn set_selected_skill(&mut self, skill: Skill) -> bool {
        if self.selected == Some(skill) {
            return false;
        }
        self.selected = Some(skill);
        true
    }
}

// ---------------------------------------------------------------------------
// Victory
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct Victory {
    pub rate: ReleaseRate,
    pub nuked: bool,
}

impl VictoryFacade for Victory {
    fn change_release_rate(&mut self, delta: i32) -> bool {
        self.rate.change(delta)
    }

    fn do_nuke(&mut self) {
        self.nuked = true;
    }
}

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Everything observable about a level, for comparing two runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSnapshot {
    pub walkers: Vec<(EntityId, Walker)>,
    pub saved: u32,
    pub lost: u32,
    pub selected: Option<Skill>,
    pub uses: [u32; 8],
    pub rate: i32,
    pub nuked: bool,
    pub ticks_run: u32,
}

#[derive(Debug)]
pub struct Level {
    pub world: World,
    pub skills: SkillPanel,
    pub victory: Victory,
    pub log: CommandLog,
    pub to_release: u32,
    pub spawn_credit: i32,
    pub ticks_run: u32,
    pub seconds: u32,
}

impl Level {
    pub fn new(to_release: u32, rate: i32, skill_uses: u32) -> Self {
        Self {
            world: World::default(),
            skills: SkillPanel::with_uses(skill_uses),
            victory: Victory {
                rate: ReleaseRate::starting_at(rate),
                nuked: false,
            },
            log: CommandLog::new(),
            to_release,
            spawn_credit: 0,
            ticks_run: 0,
            seconds: 0,
        }
    }

    /// A player command issued between frames, before `tick` runs.
    pub fn queue(&mut self, tick: TickIndex, command: Command) -> bool {
        let mut facades = Facades::new(&mut self.world, &mut self.skills, &mut self.victory);
        self.log.queue_command(tick, command, &mut facades)
    }

    /// Run ticks without a clock, the way a fast-forward would.
    pub fn run_ticks(&mut self, ticks: std::ops::Range<TickIndex>) {
        for tick in ticks {
            self.on_before_game_tick(tick);
            self.on_game_tick();
        }
    }

    pub fn snapshot(&self) -> LevelSnapshot {
        LevelSnapshot {
            walkers: self
                .world
                .walkers
                .iter()
                .map(|(id, walker)| (id, walker.clone()))
                .collect(),
            saved: self.world.saved,
            lost: self.world.lost,
            selected: self.skills.selected,
            uses: self.skills.uses,
            rate: self.victory.rate.current(),
            nuked: self.victory.nuked,
            ticks_run: self.ticks_run,
        }
    }

    fn release(&mut self) {
        if self.world.nuking || self.to_release == 0 {
            return;
        }
        self.spawn_credit += self.victory.rate.current();
        if self.spawn_credit >= SPAWN_COST {
            self.spawn_credit -= SPAWN_COST;
            self.to_release -= 1;
            self.world.walkers.insert(Walker { x: 0, skill: None });
        }
    }
}

impl TickListener for Level {
    fn on_before_game_tick(&mut self, tick: TickIndex) {
        let mut facades = Facades::new(&mut self.world, &mut self.skills, &mut self.victory);
        self.log.on_before_game_tick(tick, &mut facades);
    }

    fn on_game_tick(&mut self) {
        self.release();
        self.world.step();
        self.ticks_run += 1;
    }

    fn each_game_second(&mut self) {
        self.seconds += 1;
    }
}

// ---------------------------------------------------------------------------
// Clock driving
// ---------------------------------------------------------------------------

/// A running clock on a manual host with default pacing.
pub fn running_clock() -> SimulationClock<ManualHost> {
    let mut clock = SimulationClock::new(ManualHost::new(), ClockConfig::default());
    clock.resume(PauseSignal::USER);
    clock
}

/// Advance the host by `frame_ms` and deliver the frame, `frames` times.
/// Returns the total number of ticks stepped.
pub fn drive<L: TickListener>(
    clock: &mut SimulationClock<ManualHost>,
    listener: &mut L,
    frames: usize,
    frame_ms: f64,
) -> u64 {
    let mut steps = 0;
    for _ in 0..frames {
        clock.host_mut().advance(frame_ms);
        if let Some(report) = clock.poll(listener) {
            steps += report.steps;
        }
    }
    steps
}
