//! Domain type definitions

pub mod category;
pub mod event;
pub mod meeting;
pub mod parts;
pub mod planner;
pub mod preference;
pub mod schedule;

pub use category::{Category, CategoryCopyFlags, CategoryDefaults, CategoryTimePreference, ClassificationScores};
pub use event::{BufferTimeObject, BufferTimes, Event, OverrideField, PersistMethod, PreferredTimeRange, Reminder, Transparency};
pub use meeting::{MeetingAssist, MeetingAssistAttendee};
pub use parts::{EventPart, PartedEvent, PlannerTimeRange};
pub use planner::{AssembledPlan, DispatchReceipt, PlannerPayload, PlannerRequestBody, UserPlannerRequestBody};
pub use preference::{DayTime, UserPreference};
pub use schedule::{DayOfWeek, Granularity, MonthDay, TimeSlot, WorkTime};
