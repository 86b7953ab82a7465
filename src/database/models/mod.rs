pub mod classes;
pub mod inventory;
pub mod profile;
pub mod school;
pub mod settings;
pub mod staff;

pub use classes::{Class, NewClass, NewSection, NewSubject, Section, Subject};
pub use inventory::{
    InventoryCategory, InventoryTransaction, Item, NewCategory, NewItem, NewSupplier,
    NewTransaction, Supplier,
};
pub use profile::SchoolProfile;
pub use school::School;
pub use settings::{BulkPrintSetting, BulkPrintSettingUpdate};
pub use staff::{NewStaff, Staff, StaffUpdate};
