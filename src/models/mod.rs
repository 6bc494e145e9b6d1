pub mod employee;
pub mod leave;
pub mod replacement;

pub use employee::{CreateEmployeeRequest, Employee, UpdateEmployeeRequest};
pub use leave::{Leave, LeaveDecision, LeaveEvent, LeaveRequest, ScheduleEntry, UpdateLeaveRequest};
pub use replacement::{Replacement, ReplacementRecord};
