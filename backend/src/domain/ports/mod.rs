//! Domain ports and supporting types for the hexagonal boundary.

mod booking_store;
mod bookings_command;
mod bookings_query;

#[cfg(test)]
pub use booking_store::MockBookingStore;
pub use booking_store::{
    BookingStore, BookingStoreError, BookingWithVehicle, InMemoryBookingStore, NewBooking,
};
#[cfg(test)]
pub use bookings_command::MockBookingsCommand;
pub use bookings_command::{
    BookingDetailsPayload, BookingPayload, BookingsCommand, CancelBookingRequest,
    CreateBookingRequest, VehicleSummaryPayload,
};
#[cfg(test)]
pub use bookings_query::MockBookingsQuery;
pub use bookings_query::{
    AvailabilityRequest, AvailabilityResponse, BookingsQuery, UserBookingsRequest,
    UserBookingsResponse, VehicleBookingsRequest, VehicleBookingsResponse,
};
