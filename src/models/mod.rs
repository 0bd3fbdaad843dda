pub mod customer;
pub mod hours;
pub mod reservation;
pub mod service;
pub mod staff;

pub use customer::{Customer, CustomerPatch, NewCustomer};
pub use hours::BusinessHours;
pub use reservation::{
    Reservation, ReservationDetail, ReservationDraft, ReservationPatch, ReservationStatus,
};
pub use service::{NewService, Service, ServicePatch};
pub use staff::{NewStaff, Staff, StaffPatch};
