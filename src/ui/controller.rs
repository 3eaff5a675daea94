use chrono::{Duration, Local, NaiveDate};
use tracing::{debug, warn};

use crate::aqi::AqiDisplay;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::role::{Capabilities, Role};
use crate::model::user_info::UserInfo;

use super::client::{LeaveApi, LeaveDraft};
use super::filter::FilterCriteria;
use super::state::{Dialog, PendingAction, ViewState};

/// Create/update form; every field is required on submit.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveForm {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub reason: String,
    pub leave_type: Option<LeaveType>,
}

impl LeaveForm {
    /// Starts today, ends tomorrow, annual leave.
    pub fn defaults(today: NaiveDate) -> Self {
        Self {
            start_date: Some(today),
            end_date: Some(today + Duration::days(1)),
            reason: String::new(),
            leave_type: Some(LeaveType::Annual),
        }
    }

    fn from_request(leave: &LeaveRequest) -> Self {
        Self {
            start_date: Some(leave.start_date),
            end_date: Some(leave.end_date),
            reason: leave.reason.clone(),
            leave_type: Some(leave.leave_type),
        }
    }

    fn complete(&self) -> Option<(NaiveDate, NaiveDate, &str, LeaveType)> {
        let reason = self.reason.trim();
        if reason.is_empty() {
            return None;
        }
        Some((self.start_date?, self.end_date?, reason, self.leave_type?))
    }
}

/// Read-only details shown in the approve/reject dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusDialogView {
    pub id: String,
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub type_label: &'static str,
    pub status_label: &'static str,
}

pub struct LeaveController<A: LeaveApi> {
    api: A,
    view: ViewState,
}

impl<A: LeaveApi> LeaveController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            view: ViewState::default(),
        }
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Initial screen load: list, caller roles and the AQI widget.
    pub async fn init(&mut self) {
        self.fetch_rows().await;
        self.load_user_info().await;
        self.load_aqi(None).await;
    }

    pub async fn refresh(&mut self) {
        if self.view.is_busy() {
            debug!("refresh ignored while busy");
            return;
        }
        self.fetch_rows().await;
        self.view.toast("Leave requests refreshed");
    }

    async fn fetch_rows(&mut self) {
        match self.api.list().await {
            Ok(rows) => self.view.replace_rows(rows),
            Err(e) => {
                warn!(error = %e, "Failed to load leave requests");
                self.view.selection = None;
            }
        }
    }

    pub async fn load_user_info(&mut self) {
        let info = match self.api.user_info().await {
            Ok(info) => info,
            Err(e) => {
                warn!(error = %e, "Failed to load user info, assuming employee");
                UserInfo::new("employee", &Capabilities::from_claims(&[Role::Employee.as_ref()]))
            }
        };
        self.view.user = Some(info);
    }

    pub async fn load_aqi(&mut self, city: Option<&str>) {
        let display = match self.api.aqi(city).await {
            Ok(display) => display,
            Err(e) => {
                warn!(error = %e, "Failed to load AQI");
                AqiDisplay::unavailable()
            }
        };
        self.view.aqi = Some(display);
    }

    pub async fn refresh_aqi(&mut self, city: Option<&str>) {
        self.view.toast("Refreshing air quality data...");
        self.load_aqi(city).await;
    }

    /// Index into the visible rows; `None` clears the selection.
    pub fn select(&mut self, index: Option<usize>) {
        self.view.select(index);
    }

    pub fn apply_filters(&mut self, criteria: FilterCriteria) {
        self.view.filter = criteria;
        self.view.selection = None;
        self.view.toast("Filters applied");
    }

    pub fn reset_filters(&mut self) {
        self.view.filter = FilterCriteria::default();
        self.view.selection = None;
        self.view.toast("Filters reset");
    }

    pub fn close_dialog(&mut self) {
        self.view.close_dialog();
    }

    pub fn open_create_dialog(&mut self) -> Option<LeaveForm> {
        self.open_create_dialog_on(Local::now().date_naive())
    }

    pub fn open_create_dialog_on(&mut self, today: NaiveDate) -> Option<LeaveForm> {
        self.view
            .open_dialog(Dialog::Create)
            .then(|| LeaveForm::defaults(today))
    }

    pub async fn submit_create(&mut self, form: &LeaveForm) {
        let Some((start_date, end_date, reason, leave_type)) = form.complete() else {
            self.view.error("Please fill in all required fields");
            return;
        };
        let draft = LeaveDraft {
            start_date,
            end_date,
            reason: reason.to_string(),
            leave_type,
            status: LeaveStatus::Pending,
        };
        if !self.view.begin(PendingAction::Create) {
            return;
        }

        match self.api.create(&draft).await {
            Ok(created) => {
                debug!(id = %created.id, "Leave request created");
                self.succeed("Leave request created successfully").await;
            }
            Err(e) => self.fail(format!("Failed to create leave request: {}", e.message)),
        }
    }

    pub fn open_update_dialog(&mut self) -> Option<LeaveForm> {
        let Some(selected) = self.view.selection() else {
            self.view.error("Please select a leave request to update");
            return None;
        };
        let form = LeaveForm::from_request(&selected.request);
        self.view.open_dialog(Dialog::Update).then_some(form)
    }

    /// ID, owner and status of the selected row are preserved.
    pub async fn submit_update(&mut self, form: &LeaveForm) {
        let Some(selected) = self.view.selection().map(|s| s.request.clone()) else {
            self.view.error("No leave request selected");
            return;
        };
        let Some((start_date, end_date, reason, leave_type)) = form.complete() else {
            self.view.error("Please fill in all required fields");
            return;
        };
        let updated = LeaveRequest {
            start_date,
            end_date,
            reason: reason.to_string(),
            leave_type,
            ..selected
        };
        if !self.view.begin(PendingAction::Update) {
            return;
        }

        match self.api.update(&updated).await {
            Ok(_) => self.succeed("Leave request updated successfully").await,
            Err(e) => self.fail(format!("Failed to update leave request: {}", e.message)),
        }
    }

    pub fn confirm_delete(&mut self) -> bool {
        if self.view.selection().is_none() {
            self.view.error("Please select a leave request to delete");
            return false;
        }
        self.view.open_dialog(Dialog::Delete)
    }

    pub async fn delete_selected(&mut self) {
        let Some(id) = self.view.selection().map(|s| s.request.id.clone()) else {
            self.view.error("No leave request selected");
            return;
        };
        self.view.close_dialog();
        if !self.view.begin(PendingAction::Delete) {
            return;
        }

        match self.api.delete(&id).await {
            Ok(()) => self.succeed("Leave request deleted successfully").await,
            Err(e) => self.fail(format!("Failed to delete leave request: {}", e.message)),
        }
    }

    pub fn open_status_dialog(&mut self) -> Option<StatusDialogView> {
        let Some(selected) = self.view.selection().map(|s| s.request.clone()) else {
            self.view.error("Please select a leave request");
            return None;
        };
        if selected.status != LeaveStatus::Pending {
            self.view
                .error("Only pending requests can be approved or rejected");
            return None;
        }
        let details = StatusDialogView {
            type_label: selected.leave_type.label(),
            status_label: selected.status.label(),
            id: selected.id,
            employee_id: selected.employee_id,
            start_date: selected.start_date,
            end_date: selected.end_date,
            reason: selected.reason,
        };
        self.view.open_dialog(Dialog::StatusUpdate).then_some(details)
    }

    pub async fn submit_status(&mut self, status: Option<LeaveStatus>) {
        let Some(id) = self.view.selection().map(|s| s.request.id.clone()) else {
            self.view.error("No leave request selected");
            return;
        };
        let Some(status) = status else {
            self.view.error("Please select a status");
            return;
        };
        if !self.view.begin(PendingAction::StatusUpdate) {
            return;
        }

        match self.api.set_status(&id, status).await {
            Ok(_) => {
                let verb = match status {
                    LeaveStatus::Approved => "approved",
                    LeaveStatus::Rejected => "rejected",
                    LeaveStatus::Cancelled => "cancelled",
                    LeaveStatus::Pending => "updated",
                };
                self.succeed(&format!("Leave request {verb} successfully"))
                    .await;
            }
            Err(e) => self.fail(format!("Failed to update status: {}", e.message)),
        }
    }

    async fn succeed(&mut self, message: &str) {
        self.view.finish();
        self.view.toast(message);
        self.fetch_rows().await;
    }

    fn fail(&mut self, message: String) {
        self.view.finish();
        self.view.error(message);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::ui::client::ClientError;
    use crate::ui::state::{Notice, UiState};

    #[derive(Default)]
    struct FakeApi {
        rows: Mutex<Vec<LeaveRequest>>,
        fail_writes: Option<String>,
        list_calls: Mutex<u32>,
        sent: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn with_rows(rows: Vec<LeaveRequest>) -> Self {
            Self {
                rows: Mutex::new(rows),
                ..Self::default()
            }
        }

        fn write(&self, what: String) -> Result<(), ClientError> {
            self.sent.lock().unwrap().push(what);
            match &self.fail_writes {
                Some(msg) => Err(ClientError::new(Some(409), msg.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl LeaveApi for FakeApi {
        async fn list(&self) -> Result<Vec<LeaveRequest>, ClientError> {
            *self.list_calls.lock().unwrap() += 1;
            Ok(self.rows.lock().unwrap().clone())
        }

        async fn create(&self, draft: &LeaveDraft) -> Result<LeaveRequest, ClientError> {
            self.write(format!("create {}", draft.reason))?;
            let leave = LeaveRequest {
                id: "LVR_100".into(),
                employee_id: "E001".into(),
                start_date: draft.start_date,
                end_date: draft.end_date,
                reason: draft.reason.clone(),
                status: draft.status,
                leave_type: draft.leave_type,
            };
            self.rows.lock().unwrap().push(leave.clone());
            Ok(leave)
        }

        async fn update(&self, leave: &LeaveRequest) -> Result<LeaveRequest, ClientError> {
            self.write(format!("update {} {}", leave.id, leave.status.code()))?;
            Ok(leave.clone())
        }

        async fn set_status(
            &self,
            id: &str,
            status: LeaveStatus,
        ) -> Result<LeaveRequest, ClientError> {
            self.write(format!("status {id} {}", status.code()))?;
            let mut rows = self.rows.lock().unwrap();
            let row = rows.iter_mut().find(|r| r.id == id).unwrap();
            row.status = status;
            Ok(row.clone())
        }

        async fn delete(&self, id: &str) -> Result<(), ClientError> {
            self.write(format!("delete {id}"))?;
            self.rows.lock().unwrap().retain(|r| r.id != id);
            Ok(())
        }

        async fn user_info(&self) -> Result<UserInfo, ClientError> {
            Err(ClientError::new(None, "connection refused"))
        }

        async fn aqi(&self, _city: Option<&str>) -> Result<AqiDisplay, ClientError> {
            Err(ClientError::new(Some(502), "bad gateway"))
        }
    }

    fn leave(id: &str, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: id.into(),
            employee_id: "E001".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 4).unwrap(),
            reason: "trip".into(),
            status,
            leave_type: LeaveType::Annual,
        }
    }

    #[actix_web::test]
    async fn init_falls_back_for_user_and_aqi() {
        let mut controller = LeaveController::new(FakeApi::with_rows(vec![leave(
            "LVR_001",
            LeaveStatus::Pending,
        )]));
        controller.init().await;

        let view = controller.view();
        assert_eq!(view.visible_rows().len(), 1);
        assert_eq!(view.user_label(), "Logged in as: employee");
        assert!(!view.is_manager());
        assert!(!view.aqi().unwrap().available);
    }

    #[actix_web::test]
    async fn create_defaults_and_success_path() {
        let mut controller = LeaveController::new(FakeApi::default());
        let today = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let mut form = controller.open_create_dialog_on(today).unwrap();
        assert_eq!(form.end_date, NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(form.leave_type, Some(LeaveType::Annual));

        controller.submit_create(&form).await;
        assert_eq!(
            controller.view_mut().take_notices(),
            [Notice::Error("Please fill in all required fields".into())]
        );
        assert_eq!(controller.view().state(), UiState::DialogOpen(Dialog::Create));

        form.reason = "holiday".into();
        controller.submit_create(&form).await;
        assert_eq!(controller.view().state(), UiState::Idle);
        assert_eq!(
            controller.view_mut().take_notices(),
            [Notice::Toast("Leave request created successfully".into())]
        );
        assert_eq!(controller.view().visible_rows().len(), 1);
        assert_eq!(*controller.api.list_calls.lock().unwrap(), 1);
    }

    #[actix_web::test]
    async fn failed_write_shows_raw_error_and_skips_reload() {
        let api = FakeApi {
            fail_writes: Some("Leave request not found or already processed".into()),
            ..FakeApi::with_rows(vec![leave("LVR_001", LeaveStatus::Pending)])
        };
        let mut controller = LeaveController::new(api);
        controller.refresh().await;
        controller.view_mut().take_notices();
        controller.select(Some(0));

        assert!(controller.open_status_dialog().is_some());
        controller.submit_status(Some(LeaveStatus::Approved)).await;

        assert_eq!(controller.view().state(), UiState::Idle);
        assert_eq!(
            controller.view_mut().take_notices(),
            [Notice::Error(
                "Failed to update status: Leave request not found or already processed".into()
            )]
        );
        assert_eq!(*controller.api.list_calls.lock().unwrap(), 1);
    }

    #[actix_web::test]
    async fn status_dialog_guards() {
        let mut controller = LeaveController::new(FakeApi::with_rows(vec![
            leave("LVR_001", LeaveStatus::Approved),
            leave("LVR_002", LeaveStatus::Pending),
        ]));
        controller.refresh().await;
        controller.view_mut().take_notices();

        assert!(controller.open_status_dialog().is_none());
        controller.select(Some(0));
        assert!(controller.open_status_dialog().is_none());
        assert_eq!(
            controller.view_mut().take_notices(),
            [
                Notice::Error("Please select a leave request".into()),
                Notice::Error("Only pending requests can be approved or rejected".into()),
            ]
        );

        controller.select(Some(1));
        let details = controller.open_status_dialog().unwrap();
        assert_eq!(details.type_label, "Annual Leave");
        assert_eq!(details.status_label, "Pending");

        controller.submit_status(None).await;
        assert_eq!(
            controller.view_mut().take_notices(),
            [Notice::Error("Please select a status".into())]
        );

        controller.submit_status(Some(LeaveStatus::Rejected)).await;
        assert_eq!(
            controller.view_mut().take_notices(),
            [Notice::Toast("Leave request rejected successfully".into())]
        );
        assert!(controller.view().selection().is_none());
        assert_eq!(controller.view().visible_rows()[1].status, LeaveStatus::Rejected);
    }

    #[actix_web::test]
    async fn update_preserves_identity_and_status() {
        let mut controller =
            LeaveController::new(FakeApi::with_rows(vec![leave("LVR_001", LeaveStatus::Approved)]));
        controller.refresh().await;
        controller.select(Some(0));

        let mut form = controller.open_update_dialog().unwrap();
        form.reason = "moved".into();
        controller.submit_update(&form).await;

        assert_eq!(
            controller.api.sent.lock().unwrap().as_slice(),
            ["update LVR_001 A"]
        );
    }

    #[actix_web::test]
    async fn delete_requires_selection_and_closes_dialog() {
        let mut controller =
            LeaveController::new(FakeApi::with_rows(vec![leave("LVR_001", LeaveStatus::Pending)]));
        controller.refresh().await;
        controller.view_mut().take_notices();

        assert!(!controller.confirm_delete());
        controller.select(Some(0));
        assert!(controller.confirm_delete());
        assert_eq!(controller.view().state(), UiState::DialogOpen(Dialog::Delete));

        controller.delete_selected().await;
        assert_eq!(controller.view().state(), UiState::Idle);
        assert!(controller.view().visible_rows().is_empty());
        assert_eq!(
            controller.view_mut().take_notices(),
            [
                Notice::Error("Please select a leave request to delete".into()),
                Notice::Toast("Leave request deleted successfully".into()),
            ]
        );
    }

    #[actix_web::test]
    async fn busy_controller_ignores_new_actions() {
        let mut controller =
            LeaveController::new(FakeApi::with_rows(vec![leave("LVR_001", LeaveStatus::Pending)]));
        controller.refresh().await;
        controller.select(Some(0));
        controller.view_mut().begin(PendingAction::Update);

        controller.delete_selected().await;
        controller.refresh().await;

        assert!(controller.api.sent.lock().unwrap().is_empty());
        assert_eq!(*controller.api.list_calls.lock().unwrap(), 1);
        assert_eq!(
            controller.view().state(),
            UiState::Busy(PendingAction::Update)
        );
    }

    #[actix_web::test]
    async fn filters_narrow_visible_rows() {
        let mut other = leave("LVR_002", LeaveStatus::Pending);
        other.employee_id = "E002".into();
        let rows = vec![leave("LVR_001", LeaveStatus::Pending), other];
        let mut controller = LeaveController::new(FakeApi::with_rows(rows));
        controller.refresh().await;

        controller.apply_filters(FilterCriteria {
            employee_id: Some("E002".into()),
            ..FilterCriteria::default()
        });
        assert_eq!(controller.view().visible_rows().len(), 1);
        controller.select(Some(0));
        assert_eq!(controller.view().selection().unwrap().request.id, "LVR_002");

        controller.reset_filters();
        assert_eq!(controller.view().visible_rows().len(), 2);
        assert!(controller.view().selection().is_none());
    }
}
