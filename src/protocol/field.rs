// https://mariadb.com/kb/en/library/resultset/#field-detail-flag
// https://dev.mysql.com/doc/dev/mysql-server/latest/group__group__cs__column__definition__flags.html
bitflags::bitflags! {
    pub struct FieldFlags: u16 {
        /// Field cannot be NULL.
        const NOT_NULL = 1;
        /// Field is part of a primary key.
        const PRIMARY_KEY = 2;
        /// Field is part of a unique key/constraint.
        const UNIQUE_KEY = 4;
        /// Field is part of a (possibly non-unique) key.
        const MULTIPLE_KEY = 8;
        const BLOB = 16;
        const UNSIGNED = 32;
        const ZEROFILL = 64;
        /// Field is binary (set for binary strings).
        const BINARY = 128;
        const ENUM = 256;
        const AUTO_INCREMENT = 512;
        const TIMESTAMP = 1024;
        const SET = 2048;
        const NO_DEFAULT_VALUE = 4096;
        const ON_UPDATE_NOW = 8192;
        const NUM = 32768;
    }
}
