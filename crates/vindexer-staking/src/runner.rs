//! Input stream driver
//!
//! A reader task decodes JSON lines into [`StreamItem`]s and feeds a bounded
//! channel; the runner drains it strictly in order, one item at a time.

use {
    crate::{processor::EventProcessor, Result},
    anyhow::Context,
    std::{future::Future, path::PathBuf},
    tokio::{
        fs::File,
        io::{AsyncBufReadExt, BufReader},
        sync::mpsc,
        task::JoinHandle,
    },
    tracing::{error, info, warn},
    vindexer_common::types::{EventPosition, IndexerInput},
};

const CHANNEL_CAPACITY: usize = 1_024;

#[derive(Debug)]
pub enum StreamItem {
    Input(IndexerInput),
    /// A line that did not decode. The runner counts it as rejected.
    Undecodable { line: u64, reason: String },
}

/// Stream `path` line by line into a channel. Blank lines and `#` comments are
/// ignored.
pub fn spawn_reader(path: PathBuf) -> (mpsc::Receiver<StreamItem>, JoinHandle<anyhow::Result<()>>) {
    let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);

    let handle = tokio::spawn(async move {
        let file = File::open(&path)
            .await
            .with_context(|| format!("Failed to open input stream {}", path.display()))?;
        let mut lines = BufReader::new(file).lines();
        let mut line_number = 0u64;

        while let Some(line) = lines.next_line().await? {
            line_number += 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let item = match serde_json::from_str::<IndexerInput>(line) {
                Ok(input) => StreamItem::Input(input),
                Err(e) => StreamItem::Undecodable {
                    line: line_number,
                    reason: e.to_string(),
                },
            };
            if sender.send(item).await.is_err() {
                // runner stopped
                break;
            }
        }

        info!("Finished reading {} lines from {}", line_number, path.display());
        Ok::<_, anyhow::Error>(())
    });

    (receiver, handle)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub applied: u64,
    pub rejected: u64,
    pub skipped: u64,
}

pub struct Runner {
    processor: EventProcessor,
    resume: bool,
}

impl Runner {
    pub fn new(processor: EventProcessor, resume: bool) -> Self {
        Self { processor, resume }
    }

    pub fn processor(&self) -> &EventProcessor {
        &self.processor
    }

    /// Apply inputs until the channel closes or `shutdown` resolves. Rejected
    /// and undecodable inputs are dropped; storage failures stop the run.
    pub async fn run<F>(&self, mut items: mpsc::Receiver<StreamItem>, shutdown: F) -> Result<RunSummary>
    where
        F: Future<Output = ()>,
    {
        let cursor = if self.resume {
            self.processor.cursor()?
        } else {
            None
        };
        if let Some(position) = cursor.as_ref().and_then(|c| c.position) {
            info!("Resuming after {}", position);
        }

        tokio::pin!(shutdown);
        let mut summary = RunSummary::default();
        let mut last: Option<EventPosition> = None;

        loop {
            let input = tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping after {} inputs", summary.applied);
                    break;
                }
                item = items.recv() => match item {
                    Some(StreamItem::Input(input)) => input,
                    Some(StreamItem::Undecodable { line, reason }) => {
                        error!("Skipping undecodable input on line {}: {}", line, reason);
                        self.processor.metrics().increment_rejected();
                        summary.rejected += 1;
                        continue;
                    }
                    None => break,
                },
            };

            let position = input.position();
            if cursor.as_ref().map_or(false, |c| c.covers(position)) {
                self.processor.metrics().increment_skipped();
                summary.skipped += 1;
                continue;
            }
            if let Some(previous) = last {
                if position < previous {
                    warn!("Input at {} arrived after {}", position, previous);
                }
            }
            last = Some(position);

            match self.processor.apply(&input) {
                Ok(_) => summary.applied += 1,
                Err(e) if e.is_rejection() => summary.rejected += 1,
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{metadata::NoopMetadataFetcher, metrics::ProcessorMetrics},
        alloy_primitives::{address, Address, B256, U256},
        std::{io::Write, sync::Arc},
        vindexer_common::types::{BlockHeader, EventKind, LedgerEvent, Stake},
        vindexer_common::utils::stake_id,
        vindexer_store::{EntityStore, EntityStoreExt, MemoryStore},
    };

    const V1: Address = address!("0000000000000000000000000000000000000001");
    const S1: Address = address!("00000000000000000000000000000000000000aa");

    fn staking(block_number: u64, amount: u64) -> IndexerInput {
        IndexerInput::Event(LedgerEvent {
            block_number,
            block_timestamp: 1_700_000_000,
            transaction_hash: B256::with_last_byte(block_number as u8),
            log_index: 0,
            event: EventKind::Staking {
                staker: S1,
                validator: V1,
                amount: U256::from(amount),
            },
        })
    }

    fn runner(store: Arc<MemoryStore>, resume: bool) -> Runner {
        let processor = EventProcessor::new(store, Arc::new(NoopMetadataFetcher), ProcessorMetrics::new());
        Runner::new(processor, resume)
    }

    async fn feed(runner: &Runner, inputs: Vec<IndexerInput>) -> RunSummary {
        feed_items(runner, inputs.into_iter().map(StreamItem::Input).collect()).await
    }

    async fn feed_items(runner: &Runner, items: Vec<StreamItem>) -> RunSummary {
        let (sender, receiver) = mpsc::channel(items.len().max(1));
        for item in items {
            sender.send(item).await.unwrap();
        }
        drop(sender);
        runner.run(receiver, std::future::pending()).await.unwrap()
    }

    #[tokio::test]
    async fn test_run_counts_rejections_and_continues() {
        let store = Arc::new(MemoryStore::new());
        let runner = runner(store.clone(), false);

        let summary = feed(
            &runner,
            vec![
                staking(1, 10),
                IndexerInput::Block(BlockHeader {
                    number: 1,
                    timestamp: 1,
                    author: Address::ZERO,
                }),
                staking(2, 5),
            ],
        )
        .await;

        assert_eq!(
            summary,
            RunSummary {
                applied: 2,
                rejected: 1,
                skipped: 0
            }
        );
        let stake: Stake = store.get(&stake_id(&S1, &V1)).unwrap().unwrap();
        assert_eq!(stake.amount, U256::from(15));
    }

    #[tokio::test]
    async fn test_undecodable_lines_count_as_rejected() {
        let store = Arc::new(MemoryStore::new());
        let runner = runner(store.clone(), false);

        let summary = feed_items(
            &runner,
            vec![
                StreamItem::Input(staking(1, 10)),
                StreamItem::Undecodable {
                    line: 2,
                    reason: "expected value".to_string(),
                },
                StreamItem::Input(staking(2, 5)),
            ],
        )
        .await;

        assert_eq!(
            summary,
            RunSummary {
                applied: 2,
                rejected: 1,
                skipped: 0
            }
        );
        assert_eq!(
            runner
                .processor()
                .metrics()
                .events_rejected
                .load(std::sync::atomic::Ordering::Relaxed),
            1
        );
        let stake: Stake = store.get(&stake_id(&S1, &V1)).unwrap().unwrap();
        assert_eq!(stake.amount, U256::from(15));
    }

    #[tokio::test]
    async fn test_resume_skips_applied_inputs() {
        let store = Arc::new(MemoryStore::new());
        feed(&runner(store.clone(), false), vec![staking(1, 10), staking(2, 5)]).await;

        let summary = feed(
            &runner(store.clone(), true),
            vec![staking(1, 10), staking(2, 5), staking(3, 1)],
        )
        .await;

        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.applied, 1);
        let stake: Stake = store.get(&stake_id(&S1, &V1)).unwrap().unwrap();
        assert_eq!(stake.amount, U256::from(16));
    }

    #[tokio::test]
    async fn test_shutdown_stops_the_loop() {
        let store = Arc::new(MemoryStore::new());
        let runner = runner(store.clone(), false);
        let (_sender, receiver) = mpsc::channel::<StreamItem>(1);

        let summary = runner.run(receiver, async {}).await.unwrap();
        assert_eq!(summary, RunSummary::default());
        assert_eq!(store.count(vindexer_common::types::EntityKind::Validator).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reader_decodes_json_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# staking replay").unwrap();
        writeln!(
            file,
            r#"{{"type":"event","block_number":1,"block_timestamp":1700000000,"transaction_hash":"0x{}","log_index":0,"event":{{"name":"AddToValidatorCandidate","params":{{"validator":"0x0000000000000000000000000000000000000001"}}}}}}"#,
            "11".repeat(32)
        )
        .unwrap();
        writeln!(file).unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(
            file,
            r#"{{"type":"block","number":1,"timestamp":1700000000,"author":"0x0000000000000000000000000000000000000001"}}"#
        )
        .unwrap();

        let (mut receiver, handle) = spawn_reader(file.path().to_path_buf());

        let mut items = Vec::new();
        while let Some(item) = receiver.recv().await {
            items.push(item);
        }
        handle.await.unwrap().unwrap();

        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], StreamItem::Input(IndexerInput::Event(_))));
        assert!(matches!(items[1], StreamItem::Undecodable { line: 4, .. }));
        match &items[2] {
            StreamItem::Input(input) => assert_eq!(input.position(), EventPosition::end_of_block(1)),
            other => panic!("unexpected item {:?}", other),
        }
    }
}
