use liftbook::{
    domain::{ExerciseField, JournalId},
    Confirmation,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

#[derive(Debug, Clone, PartialEq)]
pub(super) enum Action {
    LoadJournals,
    SetAuthor(String),
    AddJournal,
    CycleListMuscleGroup(JournalId),
    OpenJournal(JournalId),
    ReloadJournal,
    CloseJournal,
    StartJournal,
    CycleMuscleGroup,
    AddEntry,
    AddExercise {
        entry: usize,
    },
    EditExercise {
        entry: usize,
        row: usize,
        field: ExerciseField,
        value: String,
    },
    CompleteSet {
        entry: usize,
        set: usize,
    },
    FlushNotes,
    ResolveConfirm(Confirmation),
    LoadCatalog,
}

pub(super) type ActionTx = UnboundedSender<Action>;
pub(super) type ActionRx = UnboundedReceiver<Action>;

pub(super) fn channel() -> (ActionTx, ActionRx) {
    mpsc::unbounded_channel()
}
