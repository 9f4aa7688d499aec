use fixed::types::I20F12;

/// Current in mA for a shunt voltage in uV across a resistance in
/// milliohms, without the tenths-of-mA truncation of
/// [`Ina219::current_from`](crate::ina219::Ina219::current_from).
#[must_use]
pub fn milliamps_from(microvolts: i32, milliohms: u16) -> I20F12 {
    I20F12::from_num(microvolts) / I20F12::from_num(milliohms)
}

#[test]
pub fn current() {
    assert_eq!(milliamps_from(1000, 100), I20F12::lit("10"));
}

#[test]
pub fn current_negative() {
    assert_eq!(milliamps_from(-1250, 100), I20F12::lit("-12.5"));
}
