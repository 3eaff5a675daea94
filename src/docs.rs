use crate::api::leave_request::{
    CreateLeave, LeaveFilter, LeaveListResponse, PatchLeaveStatus, UpdateLeave,
};
use crate::api::value_help::CodeListEntry;
use crate::aqi::status::{AqiDisplay, Pollutants};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::user_info::UserInfo;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Request Service API",
        version = "1.0.0",
        description = r#"
## Leave Request Management

OData-style CRUD service behind the leave request UI.

### Key Features
- **Leave Requests**
  - Create, read, update and delete leave requests
  - Employees see their own requests, managers and admins see all
  - Managers approve or reject pending requests
- **User Info**
  - Role summary of the logged-in caller
- **Air Quality**
  - Current AQI for the dashboard widget

### Security
Every endpoint expects a platform-issued **JWT Bearer** token carrying the caller
identifier (`sub`) and role claims (`roles`).

### Identifiers
New requests get `LVR_NNN` identifiers from a database sequence.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::update_leave,
        crate::api::leave_request::patch_leave_status,
        crate::api::leave_request::delete_leave,

        crate::api::user_info::user_info,

        crate::api::aqi::current_aqi,

        crate::api::value_help::leave_types,
        crate::api::value_help::leave_statuses
    ),
    components(
        schemas(
            LeaveRequest,
            LeaveStatus,
            LeaveType,
            LeaveFilter,
            LeaveListResponse,
            CreateLeave,
            UpdateLeave,
            PatchLeaveStatus,
            Employee,
            UserInfo,
            AqiDisplay,
            Pollutants,
            CodeListEntry
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Leave", description = "Leave request APIs"),
        (name = "User", description = "Caller role information"),
        (name = "AQI", description = "Air quality widget data"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
