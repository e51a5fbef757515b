//! Tournament engine logic: registry, standings, schedulers, promotion and
//! the phase state machine.

mod bracket;
mod phase;
mod promotion;
mod registry;
mod round_robin;
mod standings;

pub use bracket::{propagate_winners, schedule_knockout};
pub use phase::{
    generate_phase, next_swiss_round, phase_standings, record_result, replace_zones,
    schedule_fixture,
};
pub use promotion::{
    apply_seeds, fixed_import, run_import, standard_promotion, tier_split, ImportSpec,
    TierAssignment, TierPools,
};
pub use registry::{enroll, substitute};
pub use round_robin::{
    partition_groups, schedule_groups, schedule_round_robin, swiss_next_round,
};
pub use standings::{compute_standings, head_to_head};
