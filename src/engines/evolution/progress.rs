use crate::engines::evolution::history::GenerationRecord;

/// Observer for generation-level progress. The engine emits immutable
/// records and knows nothing about how they are rendered.
pub trait GenerationObserver: Send {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, record: &GenerationRecord);
}

pub struct ConsoleObserver;

impl GenerationObserver for ConsoleObserver {
    fn on_generation_start(&mut self, generation: usize) {
        println!("Generation {} starting...", generation + 1);
    }

    fn on_generation_complete(&mut self, record: &GenerationRecord) {
        println!(
            "Generation {} complete. Avg fitness: {:.4}, max fitness: {:.4}, best genome: {}, errors: {}",
            record.generation + 1,
            record.avg_fitness,
            record.max_fitness,
            record.best_genome_id,
            record.error_count
        );
    }
}

/// Observer that swallows all events; used in tests and headless runs.
pub struct NullObserver;

impl GenerationObserver for NullObserver {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _record: &GenerationRecord) {}
}

/// Forwards events over an mpsc channel to a detached consumer (for
/// example a dashboard process).
pub struct ChannelObserver {
    sender: std::sync::mpsc::Sender<GenerationEvent>,
}

#[derive(Debug, Clone)]
pub enum GenerationEvent {
    Started(usize),
    Completed(GenerationRecord),
}

impl ChannelObserver {
    pub fn new(sender: std::sync::mpsc::Sender<GenerationEvent>) -> Self {
        Self { sender }
    }
}

impl GenerationObserver for ChannelObserver {
    fn on_generation_start(&mut self, generation: usize) {
        let _ = self.sender.send(GenerationEvent::Started(generation));
    }

    fn on_generation_complete(&mut self, record: &GenerationRecord) {
        let _ = self.sender.send(GenerationEvent::Completed(*record));
    }
}
