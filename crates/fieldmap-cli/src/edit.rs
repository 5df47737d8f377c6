//! Batch edits applied to a hydrated editor.
//!
//! The `edit` command turns its flags into an [`EditPlan`] and replays it as
//! the same events a user would trigger in the form.

use anyhow::{Context, Result, bail};
use tracing::debug;

use fieldmap_editor::{EditorEvent, EventOutcome, MappingEditor, RowId};
use fieldmap_model::MappingRow;

/// Rows to remove and mappings to append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    /// 1-based display positions, as printed by `show`.
    pub removals: Vec<usize>,
    pub additions: Vec<MappingRow>,
}

/// What applying a plan changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditReport {
    pub removed: usize,
    /// Removals refused by the minimum-rows policy.
    pub blocked: usize,
    pub added: Vec<RowId>,
}

impl EditPlan {
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.additions.is_empty()
    }

    /// Applies removals (highest position first) and then additions.
    ///
    /// Positions refer to the rows before any change. Fails on a position
    /// that does not exist or on a mapping the editor rejects; rows changed
    /// before the failure stay changed.
    pub fn apply(&self, editor: &mut MappingEditor) -> Result<EditReport> {
        let mut report = EditReport::default();

        let mut positions = self.removals.clone();
        positions.sort_unstable();
        positions.dedup();
        let targets: Vec<RowId> = positions
            .iter()
            .map(|&position| {
                position
                    .checked_sub(1)
                    .and_then(|index| editor.rows().get(index))
                    .map(fieldmap_editor::MappingRowEditor::id)
                    .with_context(|| {
                        format!("no row at position {position} (editor has {} rows)", editor.len())
                    })
            })
            .collect::<Result<_>>()?;

        for row in targets.into_iter().rev() {
            match editor.handle(EditorEvent::RemoveRow(row))? {
                EventOutcome::RowRemoved(_) => report.removed += 1,
                EventOutcome::RemovalBlocked(_) => report.blocked += 1,
                outcome => bail!("unexpected outcome {outcome:?} removing row {row}"),
            }
        }

        for mapping in &self.additions {
            let row = add_mapping(editor, mapping).with_context(|| format!("add mapping {mapping}"))?;
            debug!(row = %row, mapping = %mapping, "mapping added");
            report.added.push(row);
        }

        Ok(report)
    }
}

fn add_mapping(editor: &mut MappingEditor, mapping: &MappingRow) -> Result<RowId> {
    let EventOutcome::RowAdded(row) = editor.handle(EditorEvent::AddRow)? else {
        bail!("editor did not add a row");
    };
    let events = [
        EditorEvent::SourceChanged {
            row,
            value: mapping.source.clone(),
        },
        EditorEvent::EntityChanged {
            row,
            entity: Some(mapping.entity),
        },
        EditorEvent::TargetChanged {
            row,
            value: mapping.target.clone(),
        },
    ];
    for event in events {
        editor.handle(event)?;
    }
    Ok(row)
}
