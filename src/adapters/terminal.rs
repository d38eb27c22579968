use crate::core::{Notice, Query, RenderedList, ResultsView};
use std::collections::VecDeque;
use std::io::Write;
use std::sync::{Mutex, MutexGuard};

/// Number of most recent notices a view remembers.
pub const NOTICE_HISTORY: usize = 32;

struct ViewState<W> {
    out: W,
    list: RenderedList,
    notices: VecDeque<Notice>,
}

/// Line-oriented results view over any writer (stdout in the binary).
pub struct TerminalView<W: Write + Send> {
    state: Mutex<ViewState<W>>,
}

impl<W: Write + Send> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            state: Mutex::new(ViewState {
                out,
                list: RenderedList::default(),
                notices: VecDeque::with_capacity(NOTICE_HISTORY),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ViewState<W>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn snapshot(&self) -> RenderedList {
        self.state().list.clone()
    }

    /// The most recent notices, oldest first, at most [`NOTICE_HISTORY`].
    pub fn notices(&self) -> Vec<Notice> {
        self.state().notices.iter().copied().collect()
    }

    pub fn into_inner(self) -> W {
        self.state
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .out
    }
}

fn write_line<W: Write>(out: &mut W, line: &str) {
    if let Err(e) = writeln!(out, "{}", line).and_then(|_| out.flush()) {
        tracing::warn!("Failed to write to terminal: {}", e);
    }
}

impl<W: Write + Send> ResultsView for TerminalView<W> {
    fn clear_results(&self) {
        self.state().list.items.clear();
    }

    fn hide_results(&self) {
        self.state().list.visible = false;
    }

    fn show_results(&self, query: &Query, count: Option<u64>) {
        let mut state = self.state();
        state.list.visible = true;
        let header = match count {
            Some(count) => format!("Results for {} ({} samples):", query, count),
            None => format!("Results for {}:", query),
        };
        write_line(&mut state.out, &header);
    }

    fn append_result(&self, text: &str) {
        let mut state = self.state();
        state.list.items.push(text.to_string());
        write_line(&mut state.out, &format!("  {}", text));
    }

    fn notify(&self, notice: Notice) {
        let mut state = self.state();
        if state.notices.len() == NOTICE_HISTORY {
            state.notices.pop_front();
        }
        state.notices.push_back(notice);
        write_line(&mut state.out, &format!("! {}", notice));
    }
}
