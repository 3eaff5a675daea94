use crate::aqi::AqiDisplay;
use crate::model::leave_request::LeaveRequest;
use crate::model::user_info::UserInfo;

use super::filter::FilterCriteria;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialog {
    Create,
    Update,
    Delete,
    StatusUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingAction {
    Create,
    Update,
    Delete,
    StatusUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiState {
    Idle,
    Busy(PendingAction),
    DialogOpen(Dialog),
}

/// The selected row: its index in the visible list and the full record.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub index: usize,
    pub request: LeaveRequest,
}

/// Messages for the user: a transient toast or a blocking error dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Toast(String),
    Error(String),
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub(crate) state: UiState,
    pub(crate) selection: Option<Selection>,
    pub(crate) rows: Vec<LeaveRequest>,
    pub(crate) filter: FilterCriteria,
    pub(crate) user: Option<UserInfo>,
    pub(crate) aqi: Option<AqiDisplay>,
    pub(crate) notices: Vec<Notice>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            state: UiState::Idle,
            selection: None,
            rows: Vec::new(),
            filter: FilterCriteria::default(),
            user: None,
            aqi: None,
            notices: Vec::new(),
        }
    }
}

impl ViewState {
    pub fn state(&self) -> UiState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        matches!(self.state, UiState::Busy(_))
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    pub fn aqi(&self) -> Option<&AqiDisplay> {
        self.aqi.as_ref()
    }

    /// Rows after the client-side filter.
    pub fn visible_rows(&self) -> Vec<&LeaveRequest> {
        self.filter.apply(&self.rows)
    }

    pub fn user_label(&self) -> String {
        match &self.user {
            Some(user) => format!("Logged in as: {}", user.display_role()),
            None => "Loading user info...".to_string(),
        }
    }

    pub fn is_manager(&self) -> bool {
        self.user.as_ref().is_some_and(UserInfo::has_manager_access)
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub(crate) fn toast(&mut self, msg: impl Into<String>) {
        self.notices.push(Notice::Toast(msg.into()));
    }

    pub(crate) fn error(&mut self, msg: impl Into<String>) {
        self.notices.push(Notice::Error(msg.into()));
    }

    /// Dialogs open from idle or replace another dialog, never while busy.
    pub(crate) fn open_dialog(&mut self, dialog: Dialog) -> bool {
        if self.is_busy() {
            return false;
        }
        self.state = UiState::DialogOpen(dialog);
        true
    }

    /// Closing never aborts an in-flight request.
    pub(crate) fn close_dialog(&mut self) {
        if let UiState::DialogOpen(_) = self.state {
            self.state = UiState::Idle;
        }
    }

    pub(crate) fn begin(&mut self, action: PendingAction) -> bool {
        if self.is_busy() {
            return false;
        }
        self.state = UiState::Busy(action);
        true
    }

    pub(crate) fn finish(&mut self) {
        self.state = UiState::Idle;
    }

    pub(crate) fn select(&mut self, index: Option<usize>) {
        self.selection = index.and_then(|i| {
            self.filter.apply(&self.rows).get(i).map(|r| Selection {
                index: i,
                request: (*r).clone(),
            })
        });
    }

    pub(crate) fn replace_rows(&mut self, rows: Vec<LeaveRequest>) {
        self.rows = rows;
        self.selection = None;
    }
}
