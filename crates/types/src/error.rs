use core::fmt;

use crate::abi::Word;

/// Box error codes, modeled on the POSIX errno taxonomy.
///
/// Every fallible boundary operation returns one of these or succeeds.
/// `code()` is the positive errno value; on the wire errors travel negated
/// (`to_word()`), so callers can branch on cause with a single sign check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum Error {
    General = 1,          // General error
    NoEnt = 2,            // No such file or directory
    Srch = 3,             // No such process
    Intr = 4,             // Interrupted system call
    Io = 5,               // I/O error
    NxIo = 6,             // No such device or address
    TooBig = 7,           // Argument list too long
    NoExec = 8,           // Exec format error
    BadF = 9,             // Bad file number
    Child = 10,           // No child processes
    Again = 11,           // Try again
    NoMem = 12,           // Out of memory
    Acces = 13,           // Permission denied
    Fault = 14,           // Bad address
    Busy = 16,            // Device or resource busy
    Exist = 17,           // File exists
    XDev = 18,            // Cross-device link
    NoDev = 19,           // No such device
    NotDir = 20,          // Not a directory
    IsDir = 21,           // Is a directory
    Inval = 22,           // Invalid argument
    NFile = 23,           // File table overflow
    MFile = 24,           // Too many open files
    NoTty = 25,           // Not a typewriter
    TxtBsy = 26,          // Text file busy
    FBig = 27,            // File too large
    NoSpc = 28,           // No space left on device
    SPipe = 29,           // Illegal seek
    RoFs = 30,            // Read-only file system
    MLink = 31,           // Too many links
    Pipe = 32,            // Broken pipe
    Dom = 33,             // Math argument out of domain of func
    Range = 34,           // Math result not representable
    DeadLk = 35,          // Resource deadlock would occur
    NameTooLong = 36,     // File name too long
    NoLck = 37,           // No record locks available
    NoSys = 38,           // Function not implemented
    NotEmpty = 39,        // Directory not empty
    Loop = 40,            // Too many symbolic links encountered
    NoMsg = 42,           // No message of desired type
    IdRm = 43,            // Identifier removed
    NoStr = 60,           // Device not a stream
    NoData = 61,          // No data available
    Time = 62,            // Timer expired
    NoSr = 63,            // Out of streams resources
    NoLink = 67,          // Link has been severed
    Proto = 71,           // Protocol error
    MultiHop = 72,        // Multihop attempted
    BadMsg = 74,          // Not a data message
    Overflow = 75,        // Value too large for defined data type
    IlSeq = 84,           // Illegal byte sequence
    NotSock = 88,         // Socket operation on non-socket
    DestAddrReq = 89,     // Destination address required
    MsgSize = 90,         // Message too long
    ProtoType = 91,       // Protocol wrong type for socket
    NoProtoOpt = 92,      // Protocol not available
    ProtoNoSupport = 93,  // Protocol not supported
    OpNotSupp = 95,       // Operation not supported on transport endpoint
    AfNoSupport = 97,     // Address family not supported by protocol
    AddrInUse = 98,       // Address already in use
    AddrNotAvail = 99,    // Cannot assign requested address
    NetDown = 100,        // Network is down
    NetUnreach = 101,     // Network is unreachable
    NetReset = 102,       // Network dropped connection because of reset
    ConnAborted = 103,    // Software caused connection abort
    ConnReset = 104,      // Connection reset by peer
    NoBufs = 105,         // No buffer space available
    IsConn = 106,         // Transport endpoint is already connected
    NotConn = 107,        // Transport endpoint is not connected
    TimedOut = 110,       // Connection timed out
    ConnRefused = 111,    // Connection refused
    HostUnreach = 113,    // No route to host
    Already = 114,        // Operation already in progress
    InProgress = 115,     // Operation now in progress
    Stale = 116,          // Stale NFS file handle
    DQuot = 122,          // Quota exceeded
    Canceled = 125,       // Operation Canceled
    OwnerDead = 130,      // Owner died
    NotRecoverable = 131, // State not recoverable
}

impl Error {
    /// The positive errno value of this error.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// The negated wire form carried across a box boundary.
    pub const fn to_word(self) -> Word {
        -(self as i32)
    }

    /// Look up an error by its positive errno value.
    pub fn from_code(code: i32) -> Option<Error> {
        use Error::*;
        Some(match code {
            1 => General,
            2 => NoEnt,
            3 => Srch,
            4 => Intr,
            5 => Io,
            6 => NxIo,
            7 => TooBig,
            8 => NoExec,
            9 => BadF,
            10 => Child,
            11 => Again,
            12 => NoMem,
            13 => Acces,
            14 => Fault,
            16 => Busy,
            17 => Exist,
            18 => XDev,
            19 => NoDev,
            20 => NotDir,
            21 => IsDir,
            22 => Inval,
            23 => NFile,
            24 => MFile,
            25 => NoTty,
            26 => TxtBsy,
            27 => FBig,
            28 => NoSpc,
            29 => SPipe,
            30 => RoFs,
            31 => MLink,
            32 => Pipe,
            33 => Dom,
            34 => Range,
            35 => DeadLk,
            36 => NameTooLong,
            37 => NoLck,
            38 => NoSys,
            39 => NotEmpty,
            40 => Loop,
            42 => NoMsg,
            43 => IdRm,
            60 => NoStr,
            61 => NoData,
            62 => Time,
            63 => NoSr,
            67 => NoLink,
            71 => Proto,
            72 => MultiHop,
            74 => BadMsg,
            75 => Overflow,
            84 => IlSeq,
            88 => NotSock,
            89 => DestAddrReq,
            90 => MsgSize,
            91 => ProtoType,
            92 => NoProtoOpt,
            93 => ProtoNoSupport,
            95 => OpNotSupp,
            97 => AfNoSupport,
            98 => AddrInUse,
            99 => AddrNotAvail,
            100 => NetDown,
            101 => NetUnreach,
            102 => NetReset,
            103 => ConnAborted,
            104 => ConnReset,
            105 => NoBufs,
            106 => IsConn,
            107 => NotConn,
            110 => TimedOut,
            111 => ConnRefused,
            113 => HostUnreach,
            114 => Already,
            115 => InProgress,
            116 => Stale,
            122 => DQuot,
            125 => Canceled,
            130 => OwnerDead,
            131 => NotRecoverable,
            _ => return None,
        })
    }

    /// Decode a negative wire word. Codes outside the fixed table decay to
    /// `General`; the table is the whole ABI, anything else is out of
    /// contract.
    pub fn from_word(word: Word) -> Option<Error> {
        if word >= 0 {
            return None;
        }
        Some(Error::from_code(-word).unwrap_or(Error::General))
    }

    pub const fn message(self) -> &'static str {
        use Error::*;
        match self {
            General => "General error",
            NoEnt => "No such file or directory",
            Srch => "No such process",
            Intr => "Interrupted system call",
            Io => "I/O error",
            NxIo => "No such device or address",
            TooBig => "Argument list too long",
            NoExec => "Exec format error",
            BadF => "Bad file number",
            Child => "No child processes",
            Again => "Try again",
            NoMem => "Out of memory",
            Acces => "Permission denied",
            Fault => "Bad address",
            Busy => "Device or resource busy",
            Exist => "File exists",
            XDev => "Cross-device link",
            NoDev => "No such device",
            NotDir => "Not a directory",
            IsDir => "Is a directory",
            Inval => "Invalid argument",
            NFile => "File table overflow",
            MFile => "Too many open files",
            NoTty => "Not a typewriter",
            TxtBsy => "Text file busy",
            FBig => "File too large",
            NoSpc => "No space left on device",
            SPipe => "Illegal seek",
            RoFs => "Read-only file system",
            MLink => "Too many links",
            Pipe => "Broken pipe",
            Dom => "Math argument out of domain of func",
            Range => "Math result not representable",
            DeadLk => "Resource deadlock would occur",
            NameTooLong => "File name too long",
            NoLck => "No record locks available",
            NoSys => "Function not implemented",
            NotEmpty => "Directory not empty",
            Loop => "Too many symbolic links encountered",
            NoMsg => "No message of desired type",
            IdRm => "Identifier removed",
            NoStr => "Device not a stream",
            NoData => "No data available",
            Time => "Timer expired",
            NoSr => "Out of streams resources",
            NoLink => "Link has been severed",
            Proto => "Protocol error",
            MultiHop => "Multihop attempted",
            BadMsg => "Not a data message",
            Overflow => "Value too large for defined data type",
            IlSeq => "Illegal byte sequence",
            NotSock => "Socket operation on non-socket",
            DestAddrReq => "Destination address required",
            MsgSize => "Message too long",
            ProtoType => "Protocol wrong type for socket",
            NoProtoOpt => "Protocol not available",
            ProtoNoSupport => "Protocol not supported",
            OpNotSupp => "Operation not supported on transport endpoint",
            AfNoSupport => "Address family not supported by protocol",
            AddrInUse => "Address already in use",
            AddrNotAvail => "Cannot assign requested address",
            NetDown => "Network is down",
            NetUnreach => "Network is unreachable",
            NetReset => "Network dropped connection because of reset",
            ConnAborted => "Software caused connection abort",
            ConnReset => "Connection reset by peer",
            NoBufs => "No buffer space available",
            IsConn => "Transport endpoint is already connected",
            NotConn => "Transport endpoint is not connected",
            TimedOut => "Connection timed out",
            ConnRefused => "Connection refused",
            HostUnreach => "No route to host",
            Already => "Operation already in progress",
            InProgress => "Operation now in progress",
            Stale => "Stale NFS file handle",
            DQuot => "Quota exceeded",
            Canceled => "Operation Canceled",
            OwnerDead => "Owner died",
            NotRecoverable => "State not recoverable",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (err {})", self.message(), self.code())
    }
}

impl std::error::Error for Error {}
