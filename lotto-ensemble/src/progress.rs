use lotto_db::models::PredictionBatch;

/// Fréquence (en époques) des événements émis pendant l'apprentissage d'un numéro.
pub const EPOCH_REPORT_INTERVAL: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Preparing,
    Training,
    TrainingProgress,
    Generating,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Preparing => write!(f, "Préparation des données"),
            Stage::Training => write!(f, "Apprentissage"),
            Stage::TrainingProgress => write!(f, "Apprentissage en cours"),
            Stage::Generating => write!(f, "Génération des numéros"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub stage: Stage,
    pub current: u64,
    pub total: u64,
    pub detail: String,
}

impl ProgressEvent {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.current as f64 / self.total as f64
        }
    }
}

/// Reçoit la progression d'une génération. Chaque appel est un point où l'appelant
/// reprend la main (rafraîchir un affichage, abandonner le résultat, ...).
pub trait ProgressSink {
    fn on_progress(&mut self, event: &ProgressEvent);

    /// Lot partiel mis à jour après chaque grille terminée (même `id` tout au long).
    fn on_batch(&mut self, _batch: &PredictionBatch) {}
}

pub struct NullSink;

impl ProgressSink for NullSink {
    fn on_progress(&mut self, _event: &ProgressEvent) {}
}

/// Conserve tout ce qui est émis.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<ProgressEvent>,
    pub batches: Vec<PredictionBatch>,
}

impl ProgressSink for RecordingSink {
    fn on_progress(&mut self, event: &ProgressEvent) {
        self.events.push(event.clone());
    }

    fn on_batch(&mut self, batch: &PredictionBatch) {
        self.batches.push(batch.clone());
    }
}

/// Compteur d'étapes partagé par toute une génération : `current` ne fait que croître.
pub struct ProgressTracker<'a> {
    sink: &'a mut dyn ProgressSink,
    current: u64,
    total: u64,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a mut dyn ProgressSink, total: u64) -> Self {
        Self { sink, current: 0, total }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn advance(&mut self, steps: u64) {
        self.current = (self.current + steps).min(self.total);
    }

    pub fn emit(&mut self, stage: Stage, detail: impl Into<String>) {
        let event = ProgressEvent {
            stage,
            current: self.current,
            total: self.total,
            detail: detail.into(),
        };
        self.sink.on_progress(&event);
    }

    pub fn publish(&mut self, batch: &PredictionBatch) {
        self.sink.on_batch(batch);
    }
}
