//! HTTP-level tests against the combined TutorHub router.

mod helpers;

mod availability_test;
mod booking_test;
mod catalog_test;
mod internal_test;
