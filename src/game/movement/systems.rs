use bevy::prelude::*;

use crate::game::config::InitialConfig;
use crate::game::unit::NetId;

use super::actions::CurrentAction;
use super::agent::{step_agent, AgentBody, NavAgent};
use super::events::{CapturePoses, MovementCommand, RestorePoses, UnitMoveOrder, UnitStopOrder};
use super::mover::Mover;
use super::pose::PoseSnapshot;
use super::resources::{MovementConfig, PoseStore};

/// Initialize MovementConfig and the fixed timestep from InitialConfig
pub fn init_movement_config(
    mut fixed_time: ResMut<Time<Fixed>>,
    mut movement_config: ResMut<MovementConfig>,
    initial_config: Option<Res<InitialConfig>>,
) {
    let config = match &initial_config {
        Some(cfg) => cfg.as_ref(),
        None => {
            warn!("InitialConfig not found, using defaults");
            &InitialConfig::default()
        }
    };

    fixed_time.set_timestep_seconds(1.0 / config.tick_rate);
    movement_config.arrival_threshold = config.arrival_threshold;

    info!("Movement initialized: tick rate {} Hz, arrival threshold {}", config.tick_rate, config.arrival_threshold);
}

/// Applies stop orders: cancel the current action, pause the agent.
pub fn apply_stop_orders(
    mut stop_orders: MessageReader<UnitStopOrder>,
    mut q_agents: Query<(&Mover, &mut NavAgent, &mut Transform, &mut CurrentAction)>,
) {
    for order in stop_orders.read() {
        let Ok((mover, mut agent, mut transform, mut action)) = q_agents.get_mut(order.entity) else {
            continue;
        };
        action.cancel();
        let mut body = AgentBody { agent: &mut agent, transform: &mut transform };
        mover.pause(&mut body);
    }
}

/// Applies move orders. Later orders for the same unit win.
pub fn apply_move_orders(
    mut move_orders: MessageReader<UnitMoveOrder>,
    mut params: ParamSet<(
        Query<&Transform>,
        Query<(&Mover, &mut NavAgent, &mut Transform, &mut CurrentAction)>,
    )>,
) {
    let orders: Vec<UnitMoveOrder> = move_orders.read().copied().collect();
    if orders.is_empty() {
        return;
    }

    // Snapshot target positions before any agent transform is touched
    let target_positions: Vec<Option<Vec3>> = {
        let q_transforms = params.p0();
        orders
            .iter()
            .map(|order| match order.command {
                MovementCommand::MoveToEntity { target, .. } => {
                    q_transforms.get(target).ok().map(|t| t.translation)
                }
                MovementCommand::MoveToPoint { .. } => None,
            })
            .collect()
    };

    let mut q_agents = params.p1();
    for (order, target_position) in orders.iter().zip(target_positions) {
        let Ok((mover, mut agent, mut transform, mut action)) = q_agents.get_mut(order.entity) else {
            continue;
        };
        let mut body = AgentBody { agent: &mut agent, transform: &mut transform };

        match order.command {
            MovementCommand::MoveToPoint { destination, speed_fraction } => {
                mover.move_to(&mut body, &mut *action, destination, speed_fraction);
            }
            MovementCommand::MoveToEntity { target, speed_fraction } => {
                let Some(position) = target_position else {
                    debug!("Move target {:?} no longer exists", target);
                    continue;
                };
                mover.move_to_target(&mut body, position, speed_fraction);
            }
        }
    }
}

/// Steps every agent toward its destination, one fixed tick at a time
pub fn step_nav_agents(
    fixed_time: Res<Time<Fixed>>,
    movement_config: Res<MovementConfig>,
    mut q_agents: Query<(&mut NavAgent, &mut Transform)>,
) {
    let dt = fixed_time.timestep().as_secs_f32();
    for (mut agent, mut transform) in q_agents.iter_mut() {
        if !agent.is_moving() {
            continue;
        }
        step_agent(&mut agent, &mut transform, dt, movement_config.arrival_threshold);
    }
}

/// Captures the pose of every persistent unit on a save trigger
pub fn capture_poses(
    mut triggers: MessageReader<CapturePoses>,
    mut store: ResMut<PoseStore>,
    q_units: Query<(&NetId, &Transform), With<Mover>>,
) {
    if triggers.read().count() == 0 {
        return;
    }

    store.clear();
    for (id, transform) in q_units.iter() {
        store.insert(*id, PoseSnapshot::from(transform));
    }
    info!("Captured {} unit poses", store.len());
}

/// Restores stored poses on a load trigger
pub fn restore_poses(
    mut triggers: MessageReader<RestorePoses>,
    store: Res<PoseStore>,
    mut q_units: Query<(&NetId, &Mover, &mut NavAgent, &mut Transform)>,
) {
    if triggers.read().count() == 0 {
        return;
    }

    let mut restored = 0;
    for (id, mover, mut agent, mut transform) in q_units.iter_mut() {
        let Some(snapshot) = store.get(*id) else { continue };
        let mut body = AgentBody { agent: &mut agent, transform: &mut transform };
        mover.restore(&mut body, snapshot);
        restored += 1;
    }
    info!("Restored {} unit poses", restored);
}
