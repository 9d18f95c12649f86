use strum_macros::{Display, EnumIter, EnumString};

/// Protocol visit codes, declared in schedule order.
///
/// `SC` is screening, `BL` baseline, `Vxx` scheduled in-clinic visits, `Txx`
/// telephone contacts, `Pxx` remote assessments and `Uxx` unscheduled visits.
/// Tidy output is sorted by this declaration order, not by the lexicographic
/// order of the codes (`V02` precedes `T06` on the calendar).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString,
)]
pub enum Visit {
    SC,
    RS1,
    BL,
    V01,
    V02,
    T06,
    V03,
    V04,
    T12,
    T15,
    T17,
    V05,
    T18,
    T19,
    T21,
    V06,
    T24,
    T27,
    V07,
    T30,
    T33,
    V08,
    T36,
    T39,
    V09,
    T42,
    T45,
    V10,
    T48,
    T51,
    V11,
    T54,
    T57,
    V12,
    T60,
    V13,
    T72,
    P78,
    V14,
    T84,
    P90,
    V15,
    T96,
    P102,
    V16,
    T108,
    P114,
    V17,
    P126,
    V18,
    T132,
    P138,
    V19,
    P150,
    V20,
    T156,
    U01,
    U02,
    U03,
    U04,
    U05,
    U06,
}

impl Visit {
    /// Position of this visit in the protocol schedule.
    pub fn order(self) -> u32 {
        self as u32
    }
}
