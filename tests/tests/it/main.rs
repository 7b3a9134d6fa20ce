mod derivation;
mod shamir;
mod verify;
