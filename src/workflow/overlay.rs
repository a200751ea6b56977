//! Overlay/patch pre-processor for workflow documents (spec §6
//! "Overlay/patch document", §8 scenario 7, E.6 of `SPEC_FULL.md`).
//!
//! Spec §1 lists this pre-processor among the external collaborators this
//! crate treats as "interfaces only" — but its output contract (§6) is
//! precise enough, and §8's orphan-detection scenario concrete enough, to
//! implement as a small self-contained module the interpreter never
//! depends on. Only the CLI's `-o` flag reaches for it.

// Layer 1: Standard library imports
use std::collections::HashMap;
use std::fs;
use std::path::Path;

// Layer 2: Third-party crate imports
use serde::{Deserialize, Serialize};

// Layer 3: Internal module imports
use super::errors::OverlayError;
use super::model::{Transition, Workflow};
use super::vars::expand_value;
use crate::kv::KvHandle;

/// A second YAML document describing how to assemble and patch a workflow
/// (spec §6 "Overlay/patch document").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OverlayDocument {
    /// Directories of base workflow files to merge, in order.
    #[serde(default)]
    pub bases: Vec<String>,
    /// Files that redefine or add transitions, applied in order.
    #[serde(default)]
    pub patches: Vec<String>,
    /// Global variable substitutions applied to the merged document's
    /// action arguments (build-time, distinct from the interpreter's
    /// runtime `${...}` scope).
    #[serde(default)]
    pub vars: HashMap<String, String>,
    /// Prepended to the merged workflow's name.
    #[serde(rename = "namePrefix", alias = "name_prefix", default)]
    pub name_prefix: String,
    /// Appended to the merged workflow's name.
    #[serde(rename = "nameSuffix", alias = "name_suffix", default)]
    pub name_suffix: String,
}

/// A patch file's shape: an ordered list of transitions, matched against
/// the working set by `label` (spec §6 "match-by-label merge semantics").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Patch {
    /// Transitions this patch redefines (by label) or introduces (new
    /// labels, which must anchor to an existing state — spec §7 "Orphan
    /// overlay vertex").
    #[serde(alias = "steps")]
    pub transitions: Vec<Transition>,
}

/// Merge `patches` into `base` by label, failing on orphan transitions
/// (spec §6, §7, §8 scenario 7).
///
/// A patch transition whose label already exists in the working set
/// **replaces** that transition in place (same position, new content). A
/// patch transition with a genuinely new label is appended, but only if it
/// shares at least one state token — in its `from` or `to` set — with some
/// transition already present; otherwise it has nowhere to anchor in the
/// state graph and the whole build fails.
pub fn apply_patches(base: Workflow, patches: &[Patch]) -> Result<Workflow, OverlayError> {
    let mut transitions = base.transitions;

    for patch in patches {
        for incoming in &patch.transitions {
            if let Some(slot) = transitions.iter_mut().find(|t| t.label == incoming.label) {
                *slot = incoming.clone();
                continue;
            }

            let anchors = transitions.iter().any(|existing| {
                incoming.states.from.as_set().intersection(&existing.states.from.as_set()).next().is_some()
                    || incoming.states.from.as_set().intersection(&existing.states.to.as_set()).next().is_some()
                    || incoming.states.to.as_set().intersection(&existing.states.from.as_set()).next().is_some()
                    || incoming.states.to.as_set().intersection(&existing.states.to.as_set()).next().is_some()
            });
            if !anchors && !transitions.is_empty() {
                return Err(OverlayError::Orphan(incoming.label.clone()));
            }
            transitions.push(incoming.clone());
        }
    }

    Ok(Workflow {
        name: base.name,
        initial_state: base.initial_state,
        transitions,
    })
}

/// Apply an [`OverlayDocument`]'s `vars`/`namePrefix`/`nameSuffix` to an
/// already patch-merged workflow.
///
/// Applying an empty overlay (no vars, no prefix/suffix) yields `workflow`
/// unchanged (spec §8 "Round-trip").
pub fn finish(workflow: Workflow, overlay: &OverlayDocument) -> Workflow {
    let kv = KvHandle::new();
    let renamed_name = format!("{}{}{}", overlay.name_prefix, workflow.name, overlay.name_suffix);
    let transitions = workflow
        .transitions
        .into_iter()
        .map(|mut t| {
            for action in &mut t.actions {
                action.arguments = expand_value(&action.arguments, &overlay.vars, &kv);
            }
            t
        })
        .collect();
    Workflow {
        name: renamed_name,
        initial_state: workflow.initial_state,
        transitions,
    }
}

/// Read and merge every base workflow file found (non-recursively) in
/// `dir`, in filesystem-sorted file-name order.
fn load_base_dir(dir: &str) -> Result<Workflow, OverlayError> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .map_err(|e| OverlayError::Io(dir.to_string(), e))?
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| matches!(p.extension().and_then(|e| e.to_str()), Some("yaml") | Some("yml") | Some("json")))
        .collect();
    entries.sort();

    let mut merged: Option<Workflow> = None;
    for path in entries {
        let workflow = load_workflow_file(&path)?;
        merged = Some(match merged {
            None => workflow,
            Some(existing) => Workflow {
                name: existing.name,
                initial_state: existing.initial_state,
                transitions: existing.transitions.into_iter().chain(workflow.transitions).collect(),
            },
        });
    }
    merged.ok_or_else(|| OverlayError::Io(dir.to_string(), std::io::Error::new(std::io::ErrorKind::NotFound, "no base workflow files found")))
}

fn load_workflow_file(path: &Path) -> Result<Workflow, OverlayError> {
    let text = fs::read_to_string(path).map_err(|e| OverlayError::Io(path.display().to_string(), e))?;
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        Ok(Workflow::from_json(&text)?)
    } else {
        Ok(Workflow::from_yaml(&text)?)
    }
}

fn load_patch_file(path: &Path) -> Result<Patch, OverlayError> {
    let text = fs::read_to_string(path).map_err(|e| OverlayError::Io(path.display().to_string(), e))?;
    if path.extension().and_then(|e| e.to_str()) == Some("json") {
        Ok(serde_json::from_str::<Patch>(&text).map_err(super::errors::WorkflowError::from)?)
    } else {
        Ok(serde_yaml::from_str::<Patch>(&text).map_err(super::errors::WorkflowError::from)?)
    }
}

/// Build the final workflow described by an overlay document read from
/// `overlay_path`, resolving `bases`/`patches` relative to `overlay_dir`.
pub fn build_from_disk(overlay_path: &Path, overlay_dir: &Path) -> Result<Workflow, OverlayError> {
    let text = fs::read_to_string(overlay_path).map_err(|e| OverlayError::Io(overlay_path.display().to_string(), e))?;
    let overlay: OverlayDocument = serde_yaml::from_str(&text).map_err(super::errors::WorkflowError::from)?;

    let mut base: Option<Workflow> = None;
    for base_dir in &overlay.bases {
        let dir = overlay_dir.join(base_dir);
        let workflow = load_base_dir(dir.to_string_lossy().as_ref())?;
        base = Some(match base {
            None => workflow,
            Some(existing) => Workflow {
                name: existing.name,
                initial_state: existing.initial_state,
                transitions: existing.transitions.into_iter().chain(workflow.transitions).collect(),
            },
        });
    }
    let base = base.ok_or_else(|| {
        OverlayError::Io(overlay_path.display().to_string(), std::io::Error::new(std::io::ErrorKind::NotFound, "overlay declares no bases"))
    })?;

    let mut patches = Vec::new();
    for patch_file in &overlay.patches {
        let path = overlay_dir.join(patch_file);
        patches.push(load_patch_file(&path)?);
    }

    let merged = apply_patches(base, &patches)?;
    Ok(finish(merged, &overlay))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn base_workflow() -> Workflow {
        Workflow::from_yaml(
            r#"
name: base
transitions:
  - label: a
    states: { from: ["0"], to: ["1"] }
  - label: b
    states: { from: ["1"], to: ["2"] }
  - label: c
    states: { from: ["2"], to: ["end"] }
"#,
        )
        .unwrap()
    }

    #[test]
    fn empty_overlay_leaves_base_unchanged() {
        let base = base_workflow();
        let merged = apply_patches(base.clone(), &[]).unwrap();
        let finished = finish(merged, &OverlayDocument::default());
        assert_eq!(finished, base);
    }

    #[test]
    fn patch_redefines_transition_by_label() {
        let base = base_workflow();
        let patch = Patch {
            transitions: vec![Transition {
                label: "b".to_string(),
                states: super::super::model::States {
                    from: super::super::model::StateSet(vec!["1".to_string()]),
                    to: super::super::model::StateSet(vec!["99".to_string()]),
                },
                actions: vec![],
            }],
        };
        let merged = apply_patches(base, &[patch]).unwrap();
        assert_eq!(merged.by_label("b").unwrap().states.to, super::super::model::StateSet(vec!["99".to_string()]));
        assert_eq!(merged.transitions.len(), 3);
    }

    #[test]
    fn anchored_new_transition_is_appended() {
        let base = base_workflow();
        let patch = Patch {
            transitions: vec![Transition {
                label: "d".to_string(),
                states: super::super::model::States {
                    from: super::super::model::StateSet(vec!["1".to_string()]),
                    to: super::super::model::StateSet(vec!["end".to_string()]),
                },
                actions: vec![],
            }],
        };
        let merged = apply_patches(base, &[patch]).unwrap();
        assert_eq!(merged.transitions.len(), 4);
    }

    #[test]
    fn orphan_new_transition_fails_the_build() {
        let base = base_workflow();
        let patch = Patch {
            transitions: vec![Transition {
                label: "orphan".to_string(),
                states: super::super::model::States {
                    from: super::super::model::StateSet(vec!["nowhere".to_string()]),
                    to: super::super::model::StateSet(vec!["also-nowhere".to_string()]),
                },
                actions: vec![],
            }],
        };
        let err = apply_patches(base, &[patch]).unwrap_err();
        assert!(matches!(err, OverlayError::Orphan(label) if label == "orphan"));
    }

    #[test]
    fn name_prefix_and_suffix_rename_the_merged_workflow() {
        let base = base_workflow();
        let overlay = OverlayDocument {
            name_prefix: "pre-".to_string(),
            name_suffix: "-post".to_string(),
            ..Default::default()
        };
        let finished = finish(base, &overlay);
        assert_eq!(finished.name, "pre-base-post");
    }

    #[test]
    fn overlay_document_reads_the_wire_keys_name_prefix_and_name_suffix() {
        let doc = r#"
bases: ["base"]
namePrefix: "pre-"
nameSuffix: "-post"
"#;
        let overlay: OverlayDocument = serde_yaml::from_str(doc).unwrap();
        assert_eq!(overlay.name_prefix, "pre-");
        assert_eq!(overlay.name_suffix, "-post");
    }

    #[test]
    fn vars_substitute_into_action_arguments() {
        let mut base = base_workflow();
        base.transitions[0].actions.push(crate::workflow::model::Action {
            actor: "a".to_string(),
            method: "m".to_string(),
            arguments: serde_json::Value::String("${env}".to_string()),
            mode: crate::action::ExecutionMode::Direct,
        });
        let overlay = OverlayDocument {
            vars: HashMap::from([("env".to_string(), "prod".to_string())]),
            ..Default::default()
        };
        let finished = finish(base, &overlay);
        assert_eq!(
            finished.transitions[0].actions[0].arguments,
            serde_json::Value::String("prod".to_string())
        );
    }
}
