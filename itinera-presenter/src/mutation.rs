use itinera_core::{PersistenceError, PointsModel};
use itinera_shared::{Point, UpdateType, UserAction};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::gate::MutationGate;

/// Presenter a mutation reports back to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationTarget {
    Point(Uuid),
    Creation,
}

/// Model call prepared by the trip presenter.
///
/// Owns only shared handles, so the presenter stays free for other interactions while
/// the call is awaited. Feed the outcome back through `TripPresenter::settle`.
pub struct PendingMutation {
    action: UserAction,
    target: MutationTarget,
    update_type: UpdateType,
    point: Point,
    model: Arc<dyn PointsModel>,
    gate: Arc<MutationGate>,
}

impl PendingMutation {
    pub(crate) fn new(
        action: UserAction,
        target: MutationTarget,
        update_type: UpdateType,
        point: Point,
        model: Arc<dyn PointsModel>,
        gate: Arc<MutationGate>,
    ) -> Self {
        Self {
            action,
            target,
            update_type,
            point,
            model,
            gate,
        }
    }

    pub fn action(&self) -> UserAction {
        self.action
    }

    pub fn target(&self) -> MutationTarget {
        self.target
    }

    pub fn update_type(&self) -> UpdateType {
        self.update_type
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Runs the model call through the gate
    pub async fn run(self) -> MutationOutcome {
        let Self {
            action,
            target,
            update_type,
            point,
            model,
            gate,
        } = self;

        let result = gate
            .run(async {
                match action {
                    UserAction::UpdatePoint => {
                        model.update_point(update_type, point).await.map(drop)
                    }
                    UserAction::AddPoint => model.add_point(update_type, point).await.map(drop),
                    UserAction::DeletePoint => model.delete_point(update_type, point).await,
                }
            })
            .await;

        MutationOutcome {
            action,
            target,
            result,
        }
    }
}

impl fmt::Debug for PendingMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingMutation")
            .field("action", &self.action)
            .field("target", &self.target)
            .field("update_type", &self.update_type)
            .field("point", &self.point.id)
            .finish_non_exhaustive()
    }
}

/// Tagged result of a finished mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub action: UserAction,
    pub target: MutationTarget,
    pub result: Result<(), PersistenceError>,
}
