use bevy::prelude::*;

use crate::engine::capability::{ObjectId, SceneRegistry, SingletonKind};

/// Outcome of one resolution pass for a single singleton kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindResolution {
    pub kind: SingletonKind,
    pub canonical: Option<ObjectId>,
    pub disabled: Vec<ObjectId>,
}

/// Per-kind outcome of [`resolve_duplicates`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub kinds: Vec<KindResolution>,
}

impl ResolveReport {
    pub fn canonical(&self, kind: SingletonKind) -> Option<ObjectId> {
        self.kinds
            .iter()
            .find(|r| r.kind == kind)
            .and_then(|r| r.canonical)
    }

    pub fn disabled_count(&self) -> usize {
        self.kinds.iter().map(|r| r.disabled.len()).sum()
    }
}

/// Keep exactly one enabled instance of each singleton kind.
///
/// Candidates are visited in scene load order, then root order; roots that are
/// inactive (hidden home UI) are skipped. The first candidate found stays
/// enabled (re-enabled if it was off) and every later one is disabled. Never
/// fails, and a second pass over the same scenes changes nothing.
pub fn resolve_duplicates<R: SceneRegistry + ?Sized>(registry: &mut R) -> ResolveReport {
    let mut report = ResolveReport::default();

    for kind in SingletonKind::ALL {
        let candidates = active_candidates(registry, kind);

        let canonical = candidates.first().copied();

        let mut disabled = Vec::new();
        if let Some(keep) = canonical {
            if !registry.is_enabled(keep) {
                registry.set_enabled(keep, true);
            }
            for object in candidates.iter().copied().filter(|o| *o != keep) {
                if registry.is_enabled(object) {
                    registry.set_enabled(object, false);
                    disabled.push(object);
                }
            }
        }

        if !disabled.is_empty() {
            warn!(
                "Multiple {} instances found. Keeping {}, disabled {} extra",
                kind.label(),
                canonical.map_or_else(String::new, |o| o.to_string()),
                disabled.len()
            );
        }

        report.kinds.push(KindResolution {
            kind,
            canonical,
            disabled,
        });
    }

    report
}

fn active_candidates<R: SceneRegistry + ?Sized>(registry: &R, kind: SingletonKind) -> Vec<ObjectId> {
    registry
        .loaded_scenes()
        .into_iter()
        .flat_map(|scene| registry.root_objects_of(scene))
        .filter(|root| registry.is_root_active(*root))
        .flat_map(|root| registry.singletons_under(root, kind))
        .collect()
}
