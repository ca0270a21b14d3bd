/*! Test coverage for the IR model.
 *
 * Slot numbers, merge order, and scope resolution are contract-visible
 * guarantees: a change in any of them silently changes on-chain storage
 * layout or dispatch. These tests pin the behavior.
 */

mod inherit_tests;
mod layout_tests;
mod symbol_tests;
mod type_tests;
