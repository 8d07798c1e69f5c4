/// API route handlers
///
/// Handlers decode and validate the request, call one service and encode the
/// result. Policy checks live in the services.
///
/// - `health`: Health check endpoint
/// - `auth`: Registration and login
/// - `pets`: Pet registry
/// - `bookings`: Booking lifecycle
/// - `reviews`: Reviews and ratings
/// - `offerings`: Sitter services and search
/// - `sitters`: Public sitter profiles
/// - `admin`: Moderation

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod health;
pub mod offerings;
pub mod pets;
pub mod reviews;
pub mod sitters;
