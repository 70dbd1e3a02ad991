use std::cell::RefCell;
use std::rc::Rc;

use crate::api::{server_reported_error, ElementQuery, JobStatus, TranslationService};
use crate::directory::SelectableElement;
use crate::error::{ExportError, RequestError, ViewerError};
use crate::poller::JobPoller;
use crate::ui::download_filename;
use crate::viewer::{ensure_render_loop, ViewerState};

/// Where the selection pipeline currently stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    Loading,
    Displaying,
    Error,
}

/// What the user picked in the selector.
#[derive(Clone, Debug)]
pub enum Selection {
    /// The "Select an Element" entry: clears the canvas, no request.
    Placeholder,
    Element(SelectableElement),
}

struct ControlState {
    phase: SelectionPhase,
    /// Monotonically increasing tag for selection attempts. A poll completion
    /// whose tag is no longer current belongs to a superseded selection and
    /// is discarded.
    generation: u64,
    current_label: Option<String>,
}

/// Export result: sanitized download filename plus the encoded payload.
#[derive(Clone, Debug)]
pub struct ExportedModel {
    pub filename: String,
    pub data: String,
}

/// Maps selector changes to the job / poll / load pipeline. Cheap to clone;
/// clones share the same state, which is how spawned poll tasks reach back.
pub struct SelectionController<S> {
    service: Rc<S>,
    view: Rc<RefCell<ViewerState>>,
    ctl: Rc<RefCell<ControlState>>,
    poller: JobPoller,
}

impl<S> Clone for SelectionController<S> {
    fn clone(&self) -> Self {
        Self {
            service: Rc::clone(&self.service),
            view: Rc::clone(&self.view),
            ctl: Rc::clone(&self.ctl),
            poller: self.poller,
        }
    }
}

impl<S: TranslationService + 'static> SelectionController<S> {
    pub fn new(service: S, view: ViewerState, poller: JobPoller) -> Self {
        Self {
            service: Rc::new(service),
            view: Rc::new(RefCell::new(view)),
            ctl: Rc::new(RefCell::new(ControlState {
                phase: SelectionPhase::Idle,
                generation: 0,
                current_label: None,
            })),
            poller,
        }
    }

    pub fn phase(&self) -> SelectionPhase {
        self.ctl.borrow().phase
    }

    pub fn generation(&self) -> u64 {
        self.ctl.borrow().generation
    }

    pub fn view(&self) -> &Rc<RefCell<ViewerState>> {
        &self.view
    }

    /// Handle a selector change. Every call supersedes whatever was in
    /// flight: the generation advances first, so a pending poll that lands
    /// later is recognized as stale and dropped.
    pub fn select(&self, selection: &Selection) {
        let generation = {
            let mut ctl = self.ctl.borrow_mut();
            ctl.generation += 1;
            ctl.generation
        };
        self.view.borrow_mut().viewer.clear();

        match selection {
            Selection::Placeholder => {
                let mut ctl = self.ctl.borrow_mut();
                ctl.phase = SelectionPhase::Idle;
                ctl.current_label = None;
            }
            Selection::Element(element) => {
                let Some(query) = element.query.clone() else {
                    self.fail(generation, ViewerError::Selection(element.label.clone()));
                    return;
                };
                {
                    let mut ctl = self.ctl.borrow_mut();
                    ctl.phase = SelectionPhase::Loading;
                    ctl.current_label = Some(element.label.clone());
                }
                self.start_job(generation, query);
            }
        }
    }

    /// Export the current model under the selected label's filename.
    pub fn export(&self) -> Result<ExportedModel, ExportError> {
        let data = self.view.borrow().export()?;
        let label = self
            .ctl
            .borrow()
            .current_label
            .clone()
            .unwrap_or_else(|| "model".to_string());
        Ok(ExportedModel {
            filename: download_filename(&label),
            data,
        })
    }

    fn start_job(&self, generation: u64, query: ElementQuery) {
        let this = self.clone();
        tokio::task::spawn_local(async move {
            let job = match this.service.start_job(&query).await {
                Ok(job) => job,
                Err(e) => {
                    this.fail(generation, e.into());
                    return;
                }
            };
            log::info!("translation job {} started", job.id);

            let service = Rc::clone(&this.service);
            let job_id = job.id;
            let outcome = this
                .poller
                .run(
                    move || {
                        let service = Rc::clone(&service);
                        let job_id = job_id.clone();
                        async move { service.job_status(&job_id).await }
                    },
                    |outcome: &Result<JobStatus, RequestError>| match outcome {
                        Ok(status) => status.is_terminal(),
                        // A failed status request is terminal; only 202 retries.
                        Err(_) => true,
                    },
                )
                .await;
            this.complete(generation, outcome);
        });
    }

    /// Poll completion. Anything tagged with a superseded generation is
    /// discarded before it can touch the scene or the phase.
    fn complete(&self, generation: u64, outcome: Result<JobStatus, RequestError>) {
        if generation != self.ctl.borrow().generation {
            log::debug!("dropping stale completion for selection {}", generation);
            return;
        }

        let body = match outcome {
            Ok(JobStatus::Terminal(body)) => body,
            // The poller only yields terminal statuses.
            Ok(JobStatus::Pending) => return,
            Err(e) => {
                self.fail(generation, e.into());
                return;
            }
        };

        if let Some(message) = server_reported_error(&body) {
            self.fail(generation, ViewerError::ServerReported(message));
            return;
        }

        let loaded = self.view.borrow_mut().load(&body);
        match loaded {
            Ok(()) => {
                self.ctl.borrow_mut().phase = SelectionPhase::Displaying;
                ensure_render_loop(&self.view);
            }
            Err(e) => self.fail(generation, e.into()),
        }
    }

    /// Surface an error for the given attempt, unless it was superseded.
    fn fail(&self, generation: u64, error: ViewerError) {
        if generation != self.ctl.borrow().generation {
            log::debug!("dropping stale error for selection {}: {}", generation, error);
            return;
        }
        self.view.borrow_mut().display_error(error.to_string());
        self.ctl.borrow_mut().phase = SelectionPhase::Error;
    }
}
